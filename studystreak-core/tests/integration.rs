//! Integration tests for studystreak-core
//!
//! These tests feed JSON payloads shaped like the revision-log API through
//! ingestion and every calculator.

use chrono::NaiveDate;
use studystreak_core::analytics::{
    build_heatmap, compute_aggregates, compute_streaks, RevisionReport, DEFAULT_WINDOW_DAYS,
    MAX_WINDOW_DAYS,
};
use studystreak_core::config::AnalyticsConfig;
use studystreak_core::ingest::{load_file, parse_logs};
use studystreak_core::{SessionKind, SessionRecord};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(id: &str, created_at: &str, minutes: i64, kind: &str) -> String {
    format!(
        r#"{{"id": "{id}", "duration_minutes": {minutes}, "topics_reviewed": ["Topic"],
            "effectiveness_rating": null, "notes": null, "created_at": "{created_at}",
            "material_id": null, "session_type": "{kind}"}}"#
    )
}

fn payload(entries: &[String]) -> String {
    format!(r#"{{"logs": [{}]}}"#, entries.join(","))
}

fn records_from(entries: &[String]) -> Vec<SessionRecord> {
    let parsed = parse_logs(&payload(entries)).expect("payload should parse");
    assert_eq!(parsed.rejected, 0);
    parsed.records
}

// ============================================
// Scenarios
// ============================================

#[test]
fn test_three_consecutive_days() {
    let records = records_from(&[
        entry("a", "2024-01-01T09:00:00", 30, "manual"),
        entry("b", "2024-01-02T09:00:00", 30, "manual"),
        entry("c", "2024-01-03T09:00:00", 30, "manual"),
    ]);

    let stats = compute_streaks(&records, date(2024, 1, 3));
    assert_eq!((stats.current, stats.longest), (3, 3));

    let stats = compute_streaks(&records, date(2024, 1, 5));
    assert_eq!((stats.current, stats.longest), (0, 3));
}

#[test]
fn test_login_marker_only() {
    let records = records_from(&[entry("l", "2024-02-01T08:00:00", 0, "login")]);
    let as_of = date(2024, 2, 1);

    assert_eq!(records[0].kind, SessionKind::Login);
    assert_eq!(compute_aggregates(&records, as_of).total_sessions, 0);
    assert_eq!(compute_aggregates(&records, as_of).login_count, 1);
    assert_eq!(compute_streaks(&records, as_of).current, 1);
    assert_eq!(build_heatmap(&records, as_of, 7).total_sessions(), 0);
}

#[test]
fn test_two_sessions_same_day() {
    let records = records_from(&[
        entry("a", "2024-03-01T09:00:00", 20, "manual"),
        entry("b", "2024-03-01T17:00:00", 15, "manual"),
    ]);
    let heatmap = build_heatmap(&records, date(2024, 3, 1), DEFAULT_WINDOW_DAYS);
    let day = heatmap.get(date(2024, 3, 1)).unwrap();

    assert_eq!(day.total_minutes, 35);
    assert_eq!(day.intensity_level, 2);
    assert_eq!(day.session_count, 2);
}

#[test]
fn test_long_session_intensity() {
    let records = records_from(&[entry("a", "2024-03-01T09:00:00", 150, "manual")]);
    let heatmap = build_heatmap(&records, date(2024, 3, 3), 30);
    assert_eq!(heatmap.get(date(2024, 3, 1)).unwrap().intensity_level, 4);
}

#[test]
fn test_empty_timestamp_is_excluded_everywhere() {
    let records = records_from(&[
        entry("bad", "", 60, "manual"),
        entry("ok", "2024-03-01T09:00:00", 10, "manual"),
    ]);
    let as_of = date(2024, 3, 1);

    let streaks = compute_streaks(&records, as_of);
    let heatmap = build_heatmap(&records, as_of, 7);
    let aggregates = compute_aggregates(&records, as_of);

    assert_eq!(streaks.skipped_records, 1);
    assert_eq!(streaks.active_days, 1);
    assert_eq!(heatmap.skipped_records, 1);
    assert_eq!(heatmap.total_minutes(), 10);
    assert_eq!(aggregates.skipped_records, 1);
    assert_eq!(aggregates.total_sessions, 1);
    assert_eq!(aggregates.total_minutes, 10);
}

#[test]
fn test_null_created_at_is_excluded() {
    let json = r#"{"logs": [{"id": "n", "duration_minutes": 30, "created_at": null}]}"#;
    let records = parse_logs(json).unwrap().records;
    let report = RevisionReport::generate(&records, date(2024, 1, 1), &AnalyticsConfig::default());
    assert_eq!(report.skipped_records(), 1);
    assert!(report.is_empty());
}

#[test]
fn test_utc_stamped_evening_session_keeps_streak() {
    // Server time is already Jan 3 while the student's local date is Jan 2
    let records = records_from(&[
        entry("a", "2024-01-01T18:00:00", 30, "manual"),
        entry("b", "2024-01-02T18:00:00", 30, "manual"),
        entry("c", "2024-01-03T01:30:00", 30, "manual"),
    ]);
    let report = RevisionReport::generate(&records, date(2024, 1, 2), &AnalyticsConfig::default());

    assert_eq!(report.streaks.current, 3);
    assert_eq!(report.streaks.longest, 3);
    assert!(report.heatmap.get(date(2024, 1, 3)).is_none());
    assert_eq!(report.aggregates.total_sessions, 3);
    assert_eq!(report.aggregates.this_week, 2);
}

#[test]
fn test_extreme_durations_do_not_overflow() {
    let huge = i64::MAX / 2 + 1;
    let records = records_from(&[
        entry("a", "2024-01-01T09:00:00", huge, "manual"),
        entry("b", "2024-01-01T10:00:00", huge, "manual"),
        entry("c", "2024-01-02T10:00:00", huge, "manual"),
    ]);
    let report = RevisionReport::generate(&records, date(2024, 1, 2), &AnalyticsConfig::default());

    assert_eq!(report.aggregates.total_minutes, i64::MAX);
    assert_eq!(report.heatmap.total_minutes(), i64::MAX);
    assert_eq!(
        report.heatmap.get(date(2024, 1, 1)).unwrap().total_minutes,
        i64::MAX
    );
    assert_eq!(report.streaks.current, 2);
    assert_eq!(report.skipped_records(), 0);
}

// ============================================
// Properties
// ============================================

fn mixed_log() -> Vec<SessionRecord> {
    records_from(&[
        entry("a", "2024-05-01T09:00:00", 45, "manual"),
        entry("b", "2024-05-02T09:00:00", 10, "manual"),
        entry("c", "2024-05-02T07:00:00", 0, "login"),
        entry("d", "2024-05-04T22:00:00+02:00", 130, "manual"),
        entry("e", "2024-05-05T06:00:00", 0, "login"),
        entry("f", "2024-04-10T09:00:00.250000", 60, "manual"),
        entry("g", "not a date", 60, "manual"),
    ])
}

#[test]
fn test_order_independence() {
    let as_of = date(2024, 5, 5);
    let config = AnalyticsConfig::default();
    let mut records = mixed_log();
    let expected = RevisionReport::generate(&records, as_of, &config);

    records.reverse();
    assert_eq!(RevisionReport::generate(&records, as_of, &config), expected);

    records.swap(0, 3);
    records.rotate_right(2);
    assert_eq!(RevisionReport::generate(&records, as_of, &config), expected);
}

#[test]
fn test_idempotence() {
    let as_of = date(2024, 5, 5);
    let records = mixed_log();
    assert_eq!(
        compute_streaks(&records, as_of),
        compute_streaks(&records, as_of)
    );
    assert_eq!(
        build_heatmap(&records, as_of, 60),
        build_heatmap(&records, as_of, 60)
    );
    assert_eq!(
        compute_aggregates(&records, as_of),
        compute_aggregates(&records, as_of)
    );
}

#[test]
fn test_heatmap_length_for_any_log() {
    let as_of = date(2024, 5, 5);
    for records in [Vec::new(), mixed_log()] {
        for window in [0, 13, 364, 365, 400, MAX_WINDOW_DAYS] {
            assert_eq!(
                build_heatmap(&records, as_of, window).len(),
                window as usize + 1
            );
        }
        let clamped = build_heatmap(&records, as_of, u32::MAX);
        assert_eq!(clamped.len(), clamped.window_days as usize + 1);
    }
}

#[test]
fn test_mixed_log_report() {
    let report = RevisionReport::generate(
        &mixed_log(),
        date(2024, 5, 5),
        &AnalyticsConfig::default(),
    );

    // Active dates: Apr 10, May 1, 2, 4, 5
    assert_eq!(report.streaks.current, 2);
    assert_eq!(report.streaks.longest, 2);
    assert!(report.streaks.longest >= report.streaks.current);
    assert_eq!(report.streaks.active_days, 5);

    assert_eq!(report.aggregates.total_sessions, 4);
    assert_eq!(report.aggregates.login_count, 2);
    assert_eq!(report.aggregates.total_minutes, 245);
    assert_eq!(report.aggregates.this_week, 3);
    assert_eq!(report.aggregates.this_month, 4);

    assert_eq!(report.heatmap.get(date(2024, 5, 4)).unwrap().intensity_level, 4);
    assert_eq!(report.skipped_records(), 1);
}

#[test]
fn test_load_file_roundtrip_into_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs.json");
    std::fs::write(
        &path,
        payload(&[
            entry("a", "2024-01-01T09:00:00", 30, "manual"),
            entry("b", "2024-01-02T09:00:00", 30, "manual"),
        ]),
    )
    .unwrap();

    let parsed = load_file(&path).unwrap();
    let report = RevisionReport::generate(
        &parsed.records,
        date(2024, 1, 3),
        &AnalyticsConfig::default(),
    );
    assert_eq!(report.streaks.current, 2);
    assert_eq!(report.aggregates.total_minutes, 60);
}
