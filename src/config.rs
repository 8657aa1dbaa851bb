//! Client configuration from the environment

use crate::state_machine::ClearPolicy;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("YUKTRA_ENDPOINT must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),
    #[error("YUKTRA_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
    #[error("YUKTRA_CLEAR_POLICY must be \"keep\" or \"discard\", got {0:?}")]
    InvalidClearPolicy(String),
}

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Chat endpoint that receives `{ "message": ... }`
    pub endpoint: String,
    /// Transport timeout for one request
    pub timeout: Duration,
    pub clear_policy: ClearPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            clear_policy: ClearPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values use the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = get("YUKTRA_ENDPOINT") {
            let endpoint = endpoint.trim().to_string();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidEndpoint(endpoint));
            }
            config.endpoint = endpoint;
        }

        if let Some(raw) = get("YUKTRA_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get("YUKTRA_CLEAR_POLICY") {
            config.clear_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "keep" => ClearPolicy::KeepInFlightReply,
                "discard" => ClearPolicy::DiscardInFlightReply,
                _ => return Err(ConfigError::InvalidClearPolicy(raw)),
            };
        }

        Ok(config)
    }
}
