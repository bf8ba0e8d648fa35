//! Calendar heat-map of study minutes.
//!
//! The grid is dense: one [`DaySummary`] per date from `as_of - window_days`
//! through `as_of`, however sparse the log is. Columns for display are plain
//! 7-day chunks from the oldest date; they are not aligned to any weekday.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::activity::ActivityLog;
use crate::types::{DaySummary, SessionRecord};

/// Trailing window used when none is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Largest trailing window a heat-map covers (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Days per display column.
pub const DAYS_PER_COLUMN: usize = 7;

/// Quantize a day's minutes into 0-4.
///
/// Breakpoints: none, under 30, under 60, under 120, 120 and over.
pub fn intensity_level(total_minutes: i64) -> u8 {
    match total_minutes {
        m if m <= 0 => 0,
        1..=29 => 1,
        30..=59 => 2,
        60..=119 => 3,
        _ => 4,
    }
}

/// Month header entry for the column grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    /// Abbreviated month name (e.g., "Jan")
    pub month: String,
    /// Index of the 7-day column the label sits over
    pub column: usize,
}

/// Dense per-day activity grid, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub days: Vec<DaySummary>,
    /// Records ignored because they were malformed
    pub skipped_records: usize,
}

impl Heatmap {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Oldest date in the grid.
    pub fn start(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    /// Summary for one date, if it lies in the window.
    pub fn get(&self, date: NaiveDate) -> Option<&DaySummary> {
        let start = self.start()?;
        let offset = usize::try_from((date - start).num_days()).ok()?;
        self.days.get(offset)
    }

    /// Consecutive 7-day chunks starting at the oldest date.
    ///
    /// The last chunk is shorter when the grid length is not a multiple of
    /// seven. Chunks do not start on a fixed weekday.
    pub fn weeks(&self) -> std::slice::Chunks<'_, DaySummary> {
        self.days.chunks(DAYS_PER_COLUMN)
    }

    /// Month names for the column header.
    ///
    /// A label is placed on a column when the column's first day belongs to
    /// a different month than the previous label.
    pub fn month_labels(&self) -> Vec<MonthLabel> {
        let mut labels: Vec<MonthLabel> = Vec::new();

        for (column, week) in self.weeks().enumerate() {
            let Some(first) = week.first() else {
                continue;
            };
            let month = first.date.format("%b").to_string();
            if labels.last().map(|l| l.month.as_str()) != Some(month.as_str()) {
                labels.push(MonthLabel { month, column });
            }
        }

        labels
    }

    /// Study sessions across the window.
    pub fn total_sessions(&self) -> i64 {
        self.days.iter().map(|d| d.session_count).sum()
    }

    /// Study minutes across the window, saturating at `i64::MAX`.
    pub fn total_minutes(&self) -> i64 {
        self.days
            .iter()
            .fold(0i64, |acc, d| acc.saturating_add(d.total_minutes))
    }

    /// Days in the window with any study session.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_active()).count()
    }
}

/// Build the heat-map ending at `as_of`.
///
/// The result holds `window_days + 1` entries. Windows above
/// [`MAX_WINDOW_DAYS`] are clamped to it, and `Heatmap::window_days` reports
/// the window actually used. Login markers are not study effort and add
/// neither sessions nor minutes. Records outside the window are ignored.
pub fn build_heatmap(records: &[SessionRecord], as_of: NaiveDate, window_days: u32) -> Heatmap {
    let log = ActivityLog::from_records(records);

    if window_days > MAX_WINDOW_DAYS {
        tracing::warn!(
            requested = window_days,
            max = MAX_WINDOW_DAYS,
            "Heat-map window clamped"
        );
    }
    let window_days = window_days.min(MAX_WINDOW_DAYS);

    // Windows reaching past the earliest representable date are truncated
    let start = as_of
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut days: Vec<DaySummary> = start
        .iter_days()
        .take_while(|d| *d <= as_of)
        .map(DaySummary::empty)
        .collect();

    for entry in log.effort() {
        if entry.date < start || entry.date > as_of {
            continue;
        }
        let offset = (entry.date - start).num_days() as usize;
        if let Some(day) = days.get_mut(offset) {
            day.session_count += 1;
            day.total_minutes = day.total_minutes.saturating_add(entry.record.duration_minutes);
        }
    }

    for day in &mut days {
        day.intensity_level = intensity_level(day.total_minutes);
    }

    Heatmap {
        as_of,
        window_days,
        days,
        skipped_records: log.skipped(),
    }
}
