//! Credential configuration

use secrecy::Secret;
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the bearer credential comes from
///
/// A token file takes precedence over a fixed access token. With neither,
/// requests are sent anonymously.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Fixed bearer token
    #[serde(default)]
    pub access_token: Option<Secret<String>>,

    /// File holding the bearer token, re-read before every request
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

/// Resolved credential source
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Anonymous,
    Token(Secret<String>),
    TokenFile(PathBuf),
}

impl AuthConfig {
    pub fn source(&self) -> CredentialSource {
        if let Some(path) = &self.token_file {
            return CredentialSource::TokenFile(path.clone());
        }
        match &self.access_token {
            Some(token) => CredentialSource::Token(token.clone()),
            None => CredentialSource::Anonymous,
        }
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.token_file {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::EmptyTokenFile);
            }
        }
        Ok(())
    }
}
