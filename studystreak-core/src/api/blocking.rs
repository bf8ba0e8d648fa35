//! Synchronous wrapper for [`RevisionClient`]

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::ingest::ParsedLog;

use super::client::{NewSession, RevisionClient, SessionUpdate};

/// Anything a new session can be submitted to.
///
/// Lets the login-marker guard run against the real API or a test double.
pub trait SessionSink {
    /// Submit a session, returning its server id.
    fn log_session(&self, session: &NewSession) -> Result<String>;
}

/// Blocking client for use from synchronous code.
pub struct BlockingRevisionClient {
    inner: RevisionClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingRevisionClient {
    /// Create a new blocking client from configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Api(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            inner: RevisionClient::new(config)?,
            runtime,
        })
    }

    /// Fetch the activity log, retrying transient failures (blocking)
    pub fn fetch_logs(&self) -> Result<ParsedLog> {
        self.runtime.block_on(self.inner.fetch_logs_with_retry())
    }

    /// Update a session (blocking)
    pub fn update_log(&self, log_id: &str, update: &SessionUpdate) -> Result<bool> {
        self.runtime.block_on(self.inner.update_log(log_id, update))
    }

    /// Delete a session (blocking)
    pub fn delete_log(&self, log_id: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.delete_log(log_id))
    }
}

impl SessionSink for BlockingRevisionClient {
    fn log_session(&self, session: &NewSession) -> Result<String> {
        self.runtime.block_on(self.inner.log_session(session))
    }
}
