//! # studystreak-core
//!
//! Core library for studystreak - revision streaks and study heat-maps.
//!
//! This library provides:
//! - Domain types for the activity log (study sessions and login markers)
//! - Parsing of the revision-log API payload
//! - Pure analytics: streaks, heat-map, aggregate counters
//! - A client for the revision-log API and the once-per-day login marker
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use studystreak_core::analytics::{build_heatmap, compute_streaks};
//! use studystreak_core::SessionRecord;
//!
//! let records = vec![
//!     SessionRecord::manual("a", "2024-01-01T10:00:00", 30),
//!     SessionRecord::manual("b", "2024-01-02T10:00:00", 45),
//! ];
//! let as_of = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//!
//! let streaks = compute_streaks(&records, as_of);
//! assert_eq!(streaks.current, 2);
//!
//! let heatmap = build_heatmap(&records, as_of, 365);
//! assert_eq!(heatmap.len(), 366);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::RevisionReport;
pub use config::Config;
pub use error::{Error, Result};
pub use marker::LoginMarker;
pub use types::*;

// Public modules
pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod marker;
pub mod types;
