//! Analytics module for studystreak
//!
//! Pure calculations over a snapshot of the activity log:
//! - Streaks (current and longest runs of active days)
//! - Heat-map (dense per-day grid of study minutes)
//! - Aggregates (session, minute and login counters)
//!
//! None of these perform I/O or keep state between calls. Malformed records
//! (unreadable timestamp, negative duration) are skipped and counted in each
//! result's `skipped_records` rather than reported as errors.

pub mod activity;
pub mod aggregate;
pub mod heatmap;
pub mod report;
pub mod streak;

pub use activity::{ActivityLog, DatedRecord};
pub use aggregate::{compute_aggregates, Aggregates, MONTH_WINDOW_DAYS, WEEK_WINDOW_DAYS};
pub use heatmap::{
    build_heatmap, intensity_level, Heatmap, MonthLabel, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
pub use report::RevisionReport;
pub use streak::{compute_streaks, StreakStats};
