//! Client configuration
//!
//! Everything is read from the environment once at startup and passed down
//! explicitly; nothing else in the crate consults the environment.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_VENDOR_TYPE: &str = "Driver";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TRIP_CHAT_API_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("TRIP_CHAT_HTTP_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
    #[error("TRIP_CHAT_VENDOR_TYPE must not be empty")]
    EmptyVendorType,
}

/// Where and how to reach the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    /// `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendConfig,
    /// Category requested from the vendor directory after an itinerary is confirmed
    pub vendor_type: String,
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("TRIP_CHAT_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = match lookup("TRIP_CHAT_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => None,
        };

        let vendor_type = match lookup("TRIP_CHAT_VENDOR_TYPE") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyVendorType),
            Some(raw) => raw.trim().to_string(),
            None => DEFAULT_VENDOR_TYPE.to_string(),
        };

        let log_path = lookup("TRIP_CHAT_LOG_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".trip-chat").join("trip-chat.log")
            },
            PathBuf::from,
        );

        Ok(Self {
            backend: BackendConfig { base_url, timeout },
            vendor_type,
            log_path,
        })
    }
}
