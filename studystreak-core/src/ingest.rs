//! Parsing of the revision-log JSON payload
//!
//! The server answers `GET /revision-logs/{student_id}` with
//! `{"logs": [...]}`. Hand-exported files are often just the bare array, so
//! both shapes are accepted.
//!
//! Parsing is per entry: an entry whose fields have the wrong JSON type is
//! rejected and counted, the rest of the log still loads.

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::types::{valid_rating, SessionKind, SessionRecord};

/// Result of parsing one payload.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Entries that could be read
    pub records: Vec<SessionRecord>,
    /// Entries dropped because their JSON shape was wrong
    pub rejected: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope { logs: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

/// One entry as the server serializes it. Every field may be null.
#[derive(Debug, Deserialize)]
pub(crate) struct WireLog {
    #[serde(default, deserialize_with = "id_text")]
    id: Option<String>,
    #[serde(default)]
    duration_minutes: Option<i64>,
    #[serde(default)]
    topics_reviewed: Option<Vec<String>>,
    #[serde(default)]
    effectiveness_rating: Option<i64>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "id_text")]
    material_id: Option<String>,
    #[serde(default)]
    session_type: Option<String>,
}

/// Ids arrive as strings or integers depending on the server's database.
pub(crate) fn id_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    }))
}

impl From<WireLog> for SessionRecord {
    fn from(wire: WireLog) -> Self {
        SessionRecord {
            id: wire.id.unwrap_or_default(),
            created_at: wire.created_at.unwrap_or_default(),
            duration_minutes: wire.duration_minutes.unwrap_or(0),
            topics: wire.topics_reviewed.unwrap_or_default(),
            effectiveness_rating: wire.effectiveness_rating.and_then(valid_rating),
            notes: wire.notes.filter(|n| !n.is_empty()),
            material_id: wire.material_id,
            kind: SessionKind::from_wire(wire.session_type.as_deref()),
        }
    }
}

/// Parse a payload from a JSON string.
///
/// Fails only when the document itself is not an envelope or an array.
pub fn parse_logs(json: &str) -> Result<ParsedLog> {
    let payload: Payload = serde_json::from_str(json)?;
    let entries = match payload {
        Payload::Envelope { logs } => logs,
        Payload::Bare(logs) => logs,
    };
    Ok(parse_entries(entries))
}

/// Parse already-decoded entries.
pub(crate) fn parse_entries(entries: Vec<serde_json::Value>) -> ParsedLog {
    let mut parsed = ParsedLog {
        records: Vec::with_capacity(entries.len()),
        rejected: 0,
    };

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<WireLog>(entry) {
            Ok(wire) => parsed.records.push(wire.into()),
            Err(e) => {
                tracing::debug!(index, error = %e, "Rejected revision log entry");
                parsed.rejected += 1;
            }
        }
    }

    if parsed.rejected > 0 {
        tracing::warn!(
            rejected = parsed.rejected,
            accepted = parsed.records.len(),
            "Some revision log entries could not be read"
        );
    }

    parsed
}

/// Read and parse a payload file.
pub fn load_file(path: &Path) -> Result<ParsedLog> {
    let content = std::fs::read_to_string(path)?;
    let parsed = parse_logs(&content)?;
    tracing::info!(
        path = %path.display(),
        records = parsed.records.len(),
        "Loaded revision log file"
    );
    Ok(parsed)
}
