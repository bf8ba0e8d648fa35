//! HTTP client for the revision-log endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::ingest::{id_text, parse_logs, ParsedLog};

/// Topic recorded on login markers.
pub const LOGIN_TOPIC: &str = "Login Session";

/// Notes recorded on login markers.
pub const LOGIN_NOTES: &str = "Automatic login tracking";

/// Request body for POST /revision-logs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSession {
    pub duration_minutes: i64,
    pub topics_reviewed: Vec<String>,
    pub effectiveness_rating: Option<u8>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    pub session_type: &'static str,
}

impl NewSession {
    /// A manual study session.
    pub fn manual(duration_minutes: i64, topics: Vec<String>) -> Self {
        Self {
            duration_minutes,
            topics_reviewed: topics,
            effectiveness_rating: None,
            notes: String::new(),
            material_id: None,
            session_type: "manual",
        }
    }

    /// The once-per-day attendance marker.
    pub fn login_marker() -> Self {
        Self {
            duration_minutes: 0,
            topics_reviewed: vec![LOGIN_TOPIC.to_string()],
            effectiveness_rating: None,
            notes: LOGIN_NOTES.to_string(),
            material_id: None,
            session_type: "login",
        }
    }
}

/// Request body for PUT /revision-logs/{id}
///
/// Only the fields that are set are sent; the server leaves the rest alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics_reviewed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SessionUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.duration_minutes.is_none()
            && self.topics_reviewed.is_none()
            && self.effectiveness_rating.is_none()
            && self.notes.is_none()
    }
}

/// Split a comma-separated topic list, dropping blanks.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Response from POST and PUT /revision-logs
#[derive(Debug, Deserialize)]
struct IdResponse {
    #[serde(default, deserialize_with = "id_text")]
    id: Option<String>,
}

/// HTTP client for the revision-log API
pub struct RevisionClient {
    config: ApiConfig,
    http_client: reqwest::Client,
    base_url: String,
    student_id: String,
}

impl RevisionClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .server_url
            .clone()
            .ok_or_else(|| Error::Config("api.server_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let student_id = config
            .student_id
            .clone()
            .ok_or_else(|| Error::Config("api.student_id is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let auth_value = format!("Bearer {}", token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api.token: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
            student_id,
        })
    }

    fn logs_url(&self) -> String {
        format!(
            "{}/revision-logs/{}",
            self.base_url,
            urlencoding::encode(&self.student_id)
        )
    }

    fn log_url(&self, log_id: &str) -> String {
        format!(
            "{}/revision-logs/{}",
            self.base_url,
            urlencoding::encode(log_id)
        )
    }

    /// Fetch the student's whole activity log
    pub async fn fetch_logs(&self) -> Result<ParsedLog> {
        let response = self
            .http_client
            .get(self.logs_url())
            .send()
            .await
            .map_err(|e| Error::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Api(format!("request failed: {}", e)))?;
        let parsed = parse_logs(&body)?;

        tracing::debug!(
            records = parsed.records.len(),
            rejected = parsed.rejected,
            "Fetched revision logs"
        );
        Ok(parsed)
    }

    /// Fetch with retry logic
    ///
    /// Retries transient failures (5xx, network errors) with exponential backoff.
    pub async fn fetch_logs_with_retry(&self) -> Result<ParsedLog> {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "Retrying fetch_logs (attempt {}/{}), waiting {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            match self.fetch_logs().await {
                Ok(parsed) => return Ok(parsed),
                Err(e) if is_retryable_error(&e) => {
                    tracing::warn!("Transient error fetching logs: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Api("max retries exceeded".to_string())))
    }

    /// Log a session, returning the id the server assigned
    pub async fn log_session(&self, session: &NewSession) -> Result<String> {
        let url = format!("{}/revision-logs", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(session)
            .send()
            .await
            .map_err(|e| Error::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let created: IdResponse = response
            .json()
            .await
            .map_err(|e| Error::Api(format!("failed to parse response: {}", e)))?;
        let id = created
            .id
            .ok_or_else(|| Error::Api("response carried no session id".to_string()))?;

        tracing::info!(
            id = %id,
            session_type = session.session_type,
            minutes = session.duration_minutes,
            "Logged revision session"
        );
        Ok(id)
    }

    /// Change fields of an existing session
    ///
    /// Returns false if the server has no such log.
    pub async fn update_log(&self, log_id: &str, update: &SessionUpdate) -> Result<bool> {
        let response = self
            .http_client
            .put(self.log_url(log_id))
            .json(update)
            .send()
            .await
            .map_err(|e| Error::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(id = log_id, "Updated revision session");
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(status_error(status, response).await)
        }
    }

    /// Delete a session
    ///
    /// Returns false if the server has no such log.
    pub async fn delete_log(&self, log_id: &str) -> Result<bool> {
        let response = self
            .http_client
            .delete(self.log_url(log_id))
            .send()
            .await
            .map_err(|e| Error::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(id = log_id, "Deleted revision session");
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(status_error(status, response).await)
        }
    }
}

/// Turn a non-success response into an error
async fn status_error(status: StatusCode, response: reqwest::Response) -> Error {
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::Unauthorized(format!("{}: {}", status, error_text))
    } else if status.is_server_error() {
        Error::Api(format!("server error ({}): {}", status, error_text))
    } else {
        Error::Api(format!("unexpected status ({}): {}", status, error_text))
    }
}

/// Check if an error is retryable (transient)
fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Api(msg) => msg.starts_with("request failed") || msg.starts_with("server error"),
        _ => false,
    }
}
