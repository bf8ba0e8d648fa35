//! Error types for studystreak-core

use thiserror::Error;

/// Main error type for the studystreak-core library
///
/// The analytics functions never return this: malformed records are skipped
/// and counted instead. Errors come from I/O, configuration and the API.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Revision-log API error
    #[error("API error: {0}")]
    Api(String),

    /// The server refused access to the requested log
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A date argument could not be parsed
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type alias for studystreak-core
pub type Result<T> = std::result::Result<T, Error>;
