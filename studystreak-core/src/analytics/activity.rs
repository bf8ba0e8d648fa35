//! Projection of a log snapshot onto calendar dates.
//!
//! Every calculator goes through [`ActivityLog`], so the rules for which
//! records are usable and which count as study effort live here only.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::types::SessionRecord;

/// A usable record together with its activity date.
#[derive(Debug, Clone, Copy)]
pub struct DatedRecord<'a> {
    pub date: NaiveDate,
    pub record: &'a SessionRecord,
}

impl DatedRecord<'_> {
    /// Real study session, not a login marker.
    pub fn is_effort(&self) -> bool {
        !self.record.kind.is_marker()
    }
}

/// Borrowed view of a snapshot with malformed records filtered out.
#[derive(Debug, Clone)]
pub struct ActivityLog<'a> {
    entries: Vec<DatedRecord<'a>>,
    skipped: usize,
}

impl<'a> ActivityLog<'a> {
    /// Project each record to its date.
    ///
    /// A record is skipped when its timestamp cannot be read or its duration
    /// is negative.
    pub fn from_records(records: &'a [SessionRecord]) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            match record.activity_date() {
                Some(date) if record.duration_minutes >= 0 => {
                    entries.push(DatedRecord { date, record });
                }
                _ => {
                    tracing::trace!(
                        id = %record.id,
                        created_at = %record.created_at,
                        duration = record.duration_minutes,
                        "Skipping malformed record"
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, usable = entries.len(), "Malformed records skipped");
        }

        Self { entries, skipped }
    }

    /// Usable records, in input order.
    pub fn entries(&self) -> &[DatedRecord<'a>] {
        &self.entries
    }

    /// Usable records that are study sessions.
    pub fn effort(&self) -> impl Iterator<Item = &DatedRecord<'a>> + '_ {
        self.entries.iter().filter(|e| e.is_effort())
    }

    /// Distinct dates with at least one record of any kind, ascending.
    pub fn active_dates(&self) -> BTreeSet<NaiveDate> {
        self.entries.iter().map(|e| e.date).collect()
    }

    /// Number of records that could not be used.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
