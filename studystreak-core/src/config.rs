//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/studystreak/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/studystreak/` (~/.config/studystreak/)
//! - State/Logs: `$XDG_STATE_HOME/studystreak/` (~/.local/state/studystreak/)

use crate::analytics::heatmap::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "studystreak";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Revision-log API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Revision-log API configuration
///
/// Only needed by commands that talk to the server; reading a log from a
/// file works with an empty section.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix (e.g., `http://localhost:5000/api`)
    pub server_url: Option<String>,

    /// Student whose log is fetched
    pub student_id: Option<String>,

    /// Bearer token issued at login
    pub token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_api_max_retries")]
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            student_id: None,
            token: None,
            timeout_secs: default_api_timeout(),
            max_retries: default_api_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_none() {
            return Err(Error::Config("api.server_url is required".to_string()));
        }
        if self.student_id.is_none() {
            return Err(Error::Config("api.student_id is required".to_string()));
        }
        if self.token.is_none() {
            return Err(Error::Config("api.token is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_timeout() -> u64 {
    30
}

fn default_api_max_retries() -> usize {
    3
}

/// Analytics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Trailing days covered by the heat-map (grid holds this many plus one)
    #[serde(default = "default_heatmap_window_days")]
    pub heatmap_window_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            heatmap_window_days: default_heatmap_window_days(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.heatmap_window_days > MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "analytics.heatmap_window_days must be at most {}",
                MAX_WINDOW_DAYS
            )));
        }
        Ok(())
    }
}

fn default_heatmap_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.analytics.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/studystreak/config.toml` (~/.config/studystreak/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the state directory path (for logs and the login marker)
    ///
    /// `$XDG_STATE_HOME/studystreak/` (~/.local/state/studystreak/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// Returns the login marker file path
    ///
    /// `$XDG_STATE_HOME/studystreak/last_login.json`
    pub fn login_marker_path() -> PathBuf {
        Self::state_dir().join("last_login.json")
    }
}
