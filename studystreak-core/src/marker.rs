//! Once-per-day login marker
//!
//! Each day the app is opened, one zero-minute `login` record is submitted
//! so attendance shows up in the streak. The date of the last submission is
//! kept in `$XDG_STATE_HOME/studystreak/last_login.json`.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{NewSession, SessionSink};
use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
struct MarkerFile {
    last_login_tracked: NaiveDate,
}

/// Persisted "last login recorded" date.
#[derive(Debug, Clone)]
pub struct LoginMarker {
    path: PathBuf,
}

impl LoginMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker stored in the XDG state directory.
    pub fn default_location() -> Self {
        Self::new(Config::login_marker_path())
    }

    /// Date of the last recorded login.
    ///
    /// A missing file means never. An unreadable or corrupt file is logged
    /// and treated the same.
    pub fn last_recorded(&self) -> Option<NaiveDate> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot read login marker");
                return None;
            }
        };

        match serde_json::from_str::<MarkerFile>(&content) {
            Ok(file) => Some(file.last_login_tracked),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt login marker");
                None
            }
        }
    }

    /// Whether a login still needs recording for `today`.
    pub fn should_record(&self, today: NaiveDate) -> bool {
        self.last_recorded() != Some(today)
    }

    /// Remember that `today`'s login was recorded.
    pub fn mark(&self, today: NaiveDate) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&MarkerFile {
            last_login_tracked: today,
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Submit today's login marker unless it was already sent.
///
/// The marker file is only updated after the server accepted the record, so
/// a failed submission is retried next time. Returns true if a record was sent.
pub fn record_login_if_needed(
    sink: &impl SessionSink,
    marker: &LoginMarker,
    today: NaiveDate,
) -> Result<bool> {
    if !marker.should_record(today) {
        tracing::debug!(%today, "Login already recorded today");
        return Ok(false);
    }

    let id = sink.log_session(&NewSession::login_marker())?;
    marker.mark(today)?;
    tracing::info!(%today, %id, "Recorded login marker");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<NewSession>>,
        fail: bool,
    }

    impl SessionSink for RecordingSink {
        fn log_session(&self, session: &NewSession) -> Result<String> {
            if self.fail {
                return Err(Error::Api("request failed: connection refused".to_string()));
            }
            self.sent.borrow_mut().push(session.clone());
            Ok(format!("id-{}", self.sent.borrow().len()))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_marker_means_record() {
        let dir = tempfile::tempdir().unwrap();
        let marker = LoginMarker::new(dir.path().join("state/last_login.json"));
        assert_eq!(marker.last_recorded(), None);
        assert!(marker.should_record(date(2024, 1, 1)));
    }

    #[test]
    fn test_mark_then_skip_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let marker = LoginMarker::new(dir.path().join("state/last_login.json"));
        marker.mark(date(2024, 1, 1)).unwrap();

        assert_eq!(marker.last_recorded(), Some(date(2024, 1, 1)));
        assert!(!marker.should_record(date(2024, 1, 1)));
        assert!(marker.should_record(date(2024, 1, 2)));
    }

    #[test]
    fn test_corrupt_marker_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_login.json");
        std::fs::write(&path, "{not json").unwrap();
        let marker = LoginMarker::new(path);
        assert_eq!(marker.last_recorded(), None);
        assert!(marker.should_record(date(2024, 1, 1)));
    }

    #[test]
    fn test_record_login_once_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let marker = LoginMarker::new(dir.path().join("last_login.json"));
        let sink = RecordingSink::default();
        let today = date(2024, 2, 1);

        assert!(record_login_if_needed(&sink, &marker, today).unwrap());
        assert!(!record_login_if_needed(&sink, &marker, today).unwrap());
        assert_eq!(sink.sent.borrow().len(), 1);
        assert_eq!(sink.sent.borrow()[0], NewSession::login_marker());

        assert!(record_login_if_needed(&sink, &marker, date(2024, 2, 2)).unwrap());
        assert_eq!(sink.sent.borrow().len(), 2);
    }

    #[test]
    fn test_failed_submission_not_marked() {
        let dir = tempfile::tempdir().unwrap();
        let marker = LoginMarker::new(dir.path().join("last_login.json"));
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        assert!(record_login_if_needed(&sink, &marker, date(2024, 2, 1)).is_err());
        assert_eq!(marker.last_recorded(), None);
    }
}
