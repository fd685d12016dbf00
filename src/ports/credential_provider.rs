//! Credential Provider Port - source of the bearer credential.
//!
//! The chat core never caches credentials. It asks the provider once per
//! outbound request, so a token refreshed or revoked between turns takes
//! effect on the very next dispatch.
//!
//! # Contract
//!
//! - `Ok(Some(_))`: a credential is available and should be attached
//! - `Ok(None)`: the user is unauthenticated; requests go out anonymously
//! - `Err(_)`: the source could not be read; callers treat this like `None`

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use thiserror::Error;

/// A bearer access token.
#[derive(Clone)]
pub struct Credential(Secret<String>);

impl Credential {
    /// Wraps a raw token, returning `None` if it is blank.
    pub fn bearer(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Secret::new(trimmed.to_string())))
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// Exposes the raw token (for making requests).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Errors reading a credential source.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The backing store could not be read.
    #[error("credential source unavailable: {0}")]
    Unavailable(String),

    /// The stored credential has expired and must be renewed.
    #[error("credential expired")]
    Expired,
}

impl CredentialError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Port for reading the current bearer credential.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the credential to attach right now, if any.
    async fn current(&self) -> Result<Option<Credential>, CredentialError>;
}
