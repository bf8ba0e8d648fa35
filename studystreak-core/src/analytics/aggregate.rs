//! Summary counters over the whole log.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::activity::ActivityLog;
use crate::types::SessionRecord;

/// Days back from `as_of` counted as "this week" (inclusive on both ends).
pub const WEEK_WINDOW_DAYS: u64 = 7;

/// Days back from `as_of` counted as "this month" (inclusive on both ends).
pub const MONTH_WINDOW_DAYS: u64 = 30;

/// Aggregate counters for the summary widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    /// Study sessions (login markers excluded)
    pub total_sessions: i64,
    /// Minutes over every record, markers included; saturates at `i64::MAX`
    pub total_minutes: i64,
    /// Login markers
    pub login_count: i64,
    /// Study sessions dated within the last 7 days
    pub this_week: i64,
    /// Study sessions dated within the last 30 days
    pub this_month: i64,
    /// Records ignored because they were malformed
    pub skipped_records: usize,
}

/// Compute the aggregate counters as of `as_of`.
pub fn compute_aggregates(records: &[SessionRecord], as_of: NaiveDate) -> Aggregates {
    let log = ActivityLog::from_records(records);

    let week_start = window_start(as_of, WEEK_WINDOW_DAYS);
    let month_start = window_start(as_of, MONTH_WINDOW_DAYS);

    let mut aggregates = Aggregates {
        skipped_records: log.skipped(),
        ..Default::default()
    };

    for entry in log.entries() {
        aggregates.total_minutes = aggregates
            .total_minutes
            .saturating_add(entry.record.duration_minutes);

        if !entry.is_effort() {
            aggregates.login_count += 1;
            continue;
        }

        aggregates.total_sessions += 1;
        if entry.date > as_of {
            continue;
        }
        if entry.date >= week_start {
            aggregates.this_week += 1;
        }
        if entry.date >= month_start {
            aggregates.this_month += 1;
        }
    }

    aggregates
}

fn window_start(as_of: NaiveDate, days: u64) -> NaiveDate {
    as_of
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
