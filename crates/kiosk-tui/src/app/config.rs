//! Kiosk configuration
//!
//! Loaded once at startup from a TOML file. Every field has a default so a
//! fresh terminal runs against a backend on localhost with no file at all.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use kiosk_core::{KioskError, LockoutPolicy, ReasonPolicy, DEFAULT_REASON, STUDENT_ROLE};
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "kiosk.toml";

/// Directory under the config and data roots
const APP_DIR_NAME: &str = "attendance-kiosk";

const SESSION_FILE_NAME: &str = "session.json";

const LOG_FILE_NAME: &str = "kiosk.log";

/// Longest lockout window honoured from configuration
const MAX_LOCKOUT_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Base URL of the attendance backend
    pub backend_url: String,

    /// Role options, in display order
    pub roles: Vec<String>,

    /// Visit reasons, in display order
    pub reasons: Vec<String>,

    /// When a successful check detours through the reason panel
    pub reason_policy: ReasonPolicy,

    pub stats_interval_secs: u64,

    pub request_timeout_secs: u64,

    pub lockout_max_failures: u32,

    pub lockout_window_secs: u64,

    /// Overrides `<data dir>/attendance-kiosk/session.json`
    pub session_file: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            roles: vec![STUDENT_ROLE.to_string(), "Faculty".to_string()],
            reasons: vec![
                DEFAULT_REASON.to_string(),
                "Reference".to_string(),
                "Book Issue/Return".to_string(),
                "Group Study".to_string(),
            ],
            reason_policy: ReasonPolicy::Never,
            stats_interval_secs: 15,
            request_timeout_secs: 10,
            lockout_max_failures: 5,
            lockout_window_secs: 15 * 60,
            session_file: None,
        }
    }
}

impl KioskConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(APP_DIR_NAME));
        }
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Directory for the session record and the log file
    pub fn data_dir() -> PathBuf {
        if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg_data).join(APP_DIR_NAME);
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    pub fn default_log_file() -> PathBuf {
        Self::data_dir().join(LOG_FILE_NAME)
    }

    /// Load configuration from `path`, or the default location
    ///
    /// Returns default configuration if the file doesn't exist or can't be parsed.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::config_file_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config file: {}", e);
            Self::default()
        })
    }

    /// Strict variant of [`KioskConfig::load`]
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roles.is_empty() {
            return Err(ConfigError::Invalid(KioskError::EmptyOptions("roles")));
        }
        if self.reasons.is_empty() {
            return Err(ConfigError::Invalid(KioskError::EmptyOptions("reasons")));
        }
        if self.lockout_max_failures == 0 {
            return Err(ConfigError::Value(
                "lockout_max_failures must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join(SESSION_FILE_NAME))
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        let secs = i64::try_from(self.lockout_window_secs)
            .unwrap_or(i64::MAX)
            .min(MAX_LOCKOUT_SECS);
        LockoutPolicy::custom(self.lockout_max_failures, TimeDelta::seconds(secs))
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] KioskError),

    #[error("Invalid value: {0}")]
    Value(String),
}
