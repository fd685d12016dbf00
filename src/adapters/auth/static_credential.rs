//! Fixed credential taken from configuration.

use async_trait::async_trait;

use crate::ports::{Credential, CredentialError, CredentialProvider};

/// Always returns the same credential, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    credential: Option<Credential>,
}

impl StaticCredential {
    /// A provider that never attaches a credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A provider for the given raw token; blank tokens mean anonymous.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            credential: Credential::bearer(token),
        }
    }

    pub fn from_credential(credential: Option<Credential>) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn current(&self) -> Result<Option<Credential>, CredentialError> {
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn anonymous_returns_none() {
        assert!(StaticCredential::anonymous().current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_is_returned_on_every_call() {
        let provider = StaticCredential::from_token("abc");

        for _ in 0..2 {
            let credential = provider.current().await.unwrap().unwrap();
            assert_eq!(credential.expose(), "abc");
        }
    }

    #[tokio::test]
    async fn blank_token_is_anonymous() {
        let provider = StaticCredential::from_token("   ");
        assert!(provider.current().await.unwrap().is_none());
    }
}
