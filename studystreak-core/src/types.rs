//! Core domain types for studystreak
//!
//! These types represent one student's activity log as fetched from the
//! revision-log API, and the per-day summaries derived from it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Activity log** | Every [`SessionRecord`] for one student |
//! | **Session** | A manually logged study period |
//! | **Marker** | A zero-duration login record, at most one per calendar day |
//! | **Activity date** | The calendar date written in a record's timestamp |
//! | **Intensity** | A 0-4 bucket of a day's logged minutes |

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Error, Result};

// ============================================
// Session kind
// ============================================

/// Discriminates real study sessions from synthetic login markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// A study session the student logged
    #[default]
    Manual,
    /// Automatic attendance marker recorded once per day
    Login,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Manual => "manual",
            SessionKind::Login => "login",
        }
    }

    /// Map the wire `session_type` value; anything unrecognised is a manual session.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("login") => SessionKind::Login,
            _ => SessionKind::Manual,
        }
    }

    /// True for attendance markers.
    ///
    /// Markers count as activity for streaks but never as study effort
    /// (session counts, heat-map minutes, weekly/monthly counts).
    pub fn is_marker(&self) -> bool {
        matches!(self, SessionKind::Login)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Session record
// ============================================

/// One entry of the activity log.
///
/// `created_at` is kept exactly as received; it is interpreted lazily by
/// [`SessionRecord::activity_date`] so a bad timestamp only affects the
/// record that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Raw timestamp text (ISO-8601); may be empty
    pub created_at: String,
    /// Minutes studied; negative values mark the record as malformed
    pub duration_minutes: i64,
    /// Topics reviewed, in the order entered
    pub topics: Vec<String>,
    /// Self-assessed effectiveness, 1-5
    pub effectiveness_rating: Option<u8>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Course material the session was about
    pub material_id: Option<String>,
    /// Session or login marker
    pub kind: SessionKind,
}

impl SessionRecord {
    /// A manual study session with no topics or rating.
    pub fn manual(id: impl Into<String>, created_at: impl Into<String>, minutes: i64) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            duration_minutes: minutes,
            topics: Vec::new(),
            effectiveness_rating: None,
            notes: None,
            material_id: None,
            kind: SessionKind::Manual,
        }
    }

    /// A zero-duration login marker.
    pub fn login(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            kind: SessionKind::Login,
            ..Self::manual(id, created_at, 0)
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rating; values outside 1-5 are dropped.
    pub fn with_rating(mut self, rating: i64) -> Self {
        self.effectiveness_rating = valid_rating(rating);
        self
    }

    /// Calendar date this record is attributed to, or `None` if the timestamp
    /// cannot be read.
    pub fn activity_date(&self) -> Option<NaiveDate> {
        parse_activity_date(&self.created_at)
    }
}

/// Keep a rating only if it lies in 1-5.
pub(crate) fn valid_rating(rating: i64) -> Option<u8> {
    if (1..=5).contains(&rating) {
        Some(rating as u8)
    } else {
        None
    }
}

/// Read the calendar date a timestamp is written in.
///
/// No timezone conversion happens: `2024-01-01T23:30:00-05:00` is dated
/// 2024-01-01 even though it is 2024-01-02 in UTC. Callers that log across
/// timezones must normalise timestamps before handing them over.
///
/// Accepted: RFC 3339, naive ISO date-times (`T` or space separated, optional
/// fractional seconds) and bare `YYYY-MM-DD` dates.
pub fn parse_activity_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse a `YYYY-MM-DD` argument such as an `as_of` date.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

// ============================================
// Day summary
// ============================================

/// Activity on one calendar date of the heat-map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Study sessions (markers excluded)
    pub session_count: i64,
    /// Minutes from study sessions on this date
    pub total_minutes: i64,
    /// 0-4 quantization of `total_minutes`
    pub intensity_level: u8,
}

impl DaySummary {
    /// An empty day.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            session_count: 0,
            total_minutes: 0,
            intensity_level: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_count > 0 || self.total_minutes > 0
    }
}
