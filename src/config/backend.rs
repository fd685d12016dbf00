//! Chatbot service connection configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where the chatbot service lives
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. `https://bots.example.com/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("BACKEND__BASE_URL"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout() -> u64 {
    60
}
