//! One-shot report over a log snapshot.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{compute_aggregates, Aggregates};
use super::heatmap::{build_heatmap, Heatmap};
use super::streak::{compute_streaks, StreakStats};
use crate::config::AnalyticsConfig;
use crate::types::SessionRecord;

/// Streaks, heat-map and aggregates computed from the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionReport {
    pub as_of: NaiveDate,
    pub streaks: StreakStats,
    pub aggregates: Aggregates,
    pub heatmap: Heatmap,
}

impl RevisionReport {
    /// Run every calculator on `records`.
    ///
    /// Recomputed from scratch on each call; nothing is cached between calls.
    pub fn generate(
        records: &[SessionRecord],
        as_of: NaiveDate,
        config: &AnalyticsConfig,
    ) -> Self {
        let report = Self {
            as_of,
            streaks: compute_streaks(records, as_of),
            aggregates: compute_aggregates(records, as_of),
            heatmap: build_heatmap(records, as_of, config.heatmap_window_days),
        };

        let skipped = report.skipped_records();
        if skipped > 0 {
            tracing::warn!(
                skipped,
                total = records.len(),
                "Malformed records left out of the report"
            );
        }

        tracing::info!(
            %as_of,
            records = records.len(),
            current_streak = report.streaks.current,
            longest_streak = report.streaks.longest,
            sessions = report.aggregates.total_sessions,
            "Revision report generated"
        );

        report
    }

    /// Records every calculator ignored as malformed.
    pub fn skipped_records(&self) -> usize {
        self.streaks.skipped_records
    }

    /// True when the log had nothing usable.
    pub fn is_empty(&self) -> bool {
        self.streaks.active_days == 0
    }
}
