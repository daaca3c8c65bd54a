//! Client configuration.
//!
//! Values come from environment variables (a `.env` file is honored by the
//! binary) and can be overridden by command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SESSION_FILE: &str = ".enrollment_session.json";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the REST API; endpoint paths are appended to it.
    pub base_url: Url,
    /// Where the logged-in user and token are kept between runs.
    pub session_file: PathBuf,
    /// Request timeout. `None` leaves the HTTP client default in place.
    pub timeout: Option<Duration>,
    /// Interval for `notifications --watch`.
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// - `ENROLL_API_BASE_URL` (default: `http://localhost:8000/api`)
    /// - `ENROLL_SESSION_FILE` (default: `.enrollment_session.json`)
    /// - `ENROLL_TIMEOUT_SECS` (default: unset)
    /// - `ENROLL_POLL_INTERVAL_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("ENROLL_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let session_file = std::env::var("ENROLL_SESSION_FILE")
            .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            session_file: PathBuf::from(session_file),
            timeout: env_secs("ENROLL_TIMEOUT_SECS")?.map(Duration::from_secs),
            poll_interval: Duration::from_secs(
                env_secs("ENROLL_POLL_INTERVAL_SECS")?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
        })
    }

    /// Configuration pointing at a given server, used by tests and overrides.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            timeout: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        })
    }
}

/// Parses a base URL and makes sure it ends with `/` so that
/// `Url::join` appends endpoint paths instead of replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(raw, e.to_string()))
}

fn env_secs(var: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), value)),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} must be a whole number of seconds, got {1:?}")]
    InvalidNumber(String, String),
}
