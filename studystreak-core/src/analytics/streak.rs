//! Consecutive-day revision streaks.

use chrono::NaiveDate;
use serde::Serialize;

use super::activity::ActivityLog;
use crate::types::SessionRecord;

/// Streak statistics as of a given date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Length of the run ending at the latest active date, if that date is
    /// not before the day before `as_of`; otherwise 0
    pub current: i64,
    /// Longest run of consecutive active dates
    pub longest: i64,
    /// First date of the longest run (earliest run on ties)
    pub longest_start: Option<NaiveDate>,
    /// Last date of the longest run
    pub longest_end: Option<NaiveDate>,
    /// Distinct dates with any activity
    pub active_days: i64,
    /// Records ignored because they were malformed
    pub skipped_records: usize,
}

/// Compute current and longest streaks.
///
/// A date is active when any record falls on it, login markers included.
/// Missing the current day does not break the streak yet: activity ending
/// yesterday still counts as current. Records dated after `as_of` (server
/// clock in UTC, `as_of` in local time) count on their own date and keep the
/// run they end alive.
pub fn compute_streaks(records: &[SessionRecord], as_of: NaiveDate) -> StreakStats {
    let log = ActivityLog::from_records(records);
    let dates = log.active_dates();

    let mut stats = StreakStats {
        active_days: dates.len() as i64,
        skipped_records: log.skipped(),
        ..Default::default()
    };

    let mut run_len = 0i64;
    let mut run_start: Option<NaiveDate> = None;
    let mut prev: Option<NaiveDate> = None;

    for &date in &dates {
        match prev {
            Some(p) if p.succ_opt() == Some(date) => run_len += 1,
            _ => {
                run_len = 1;
                run_start = Some(date);
            }
        }

        if run_len > stats.longest {
            stats.longest = run_len;
            stats.longest_start = run_start;
            stats.longest_end = Some(date);
        }

        prev = Some(date);
    }

    // `run_len` now describes the run ending at the latest active date
    if let Some(latest) = prev {
        let alive = match as_of.pred_opt() {
            Some(yesterday) => latest >= yesterday,
            None => true,
        };
        if alive {
            stats.current = run_len;
        }
    }

    stats
}
