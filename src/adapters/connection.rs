//! Shared HTTP connection settings for the chat backend and registry.

use reqwest::Client;
use std::time::Duration;

/// Default API root of the chatbot service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Where the service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Sets the base URL, dropping any trailing slashes.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Joins path segments onto the base URL, keeping the trailing slash
    /// the service's routes expect.
    pub fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment.trim_matches('/'));
        }
        url.push('/');
        url
    }

    /// Builds a reqwest client honoring the configured timeout.
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

/// Caps an error body so logs and error messages stay readable.
pub(crate) fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
