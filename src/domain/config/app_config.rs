//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Backend address used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Request timeout used when nothing else is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub input_device: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            input_device: None,
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            input_device: other.input_device.or(self.input_device),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    /// Server URL without a trailing slash, or the default
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    /// Input device name, if one was chosen (blank means default device)
    pub fn input_device(&self) -> Option<&str> {
        self.input_device
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Request timeout, or the default when unset or zero
    pub fn request_timeout_or_default(&self) -> std::time::Duration {
        let secs = self
            .request_timeout_secs
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        std::time::Duration::from_secs(secs)
    }
}
