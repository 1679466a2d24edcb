//! Configuration
//!
//! `SiaConfig` is merged from built-in defaults, an optional global file, an
//! optional explicit file, and `SIA_*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MISSING_SERVER: &str = "SIA_SERVER_URL and SIA_API_KEY must be set before using this CLI";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiaConfig {
    /// Base URL of the SIA server, e.g. `http://localhost:8080`
    #[serde(default)]
    pub server_url: Option<String>,

    /// Key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SiaConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl SiaConfig {
    /// Server URL and API key; both must be present and non-blank.
    pub fn require_server(&self) -> Result<(&str, &str), ApiError> {
        let server_url = non_blank(self.server_url.as_deref());
        let api_key = non_blank(self.api_key.as_deref());
        match (server_url, api_key) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(ApiError::ConfigError(MISSING_SERVER.to_string())),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
