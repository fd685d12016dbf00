//! Mock credential provider for testing.
//!
//! The token can be swapped or revoked while the session is running, which
//! is how tests check that credentials are read per request.
//!
//! # Example
//!
//! ```ignore
//! let credentials = MockCredentialProvider::with_token("first");
//! // ... submit a turn ...
//! credentials.set_token("second");
//! // ... the next request carries "second" ...
//! ```

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::ports::{Credential, CredentialError, CredentialProvider};

#[derive(Debug, Clone, Default)]
pub struct MockCredentialProvider {
    credential: Arc<RwLock<Option<Credential>>>,
    force_error: Arc<RwLock<Option<CredentialError>>>,
    reads: Arc<RwLock<usize>>,
}

impl MockCredentialProvider {
    /// Creates a signed-out provider.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set_token(token);
        provider
    }

    /// Forces all reads to return the specified error.
    pub fn with_error(self, error: CredentialError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.credential.write().unwrap() = Credential::bearer(token);
    }

    pub fn sign_out(&self) {
        *self.credential.write().unwrap() = None;
    }

    /// Number of times the credential was read.
    pub fn read_count(&self) -> usize {
        *self.reads.read().unwrap()
    }
}

#[async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn current(&self) -> Result<Option<Credential>, CredentialError> {
        *self.reads.write().unwrap() += 1;

        if let Some(err) = self.force_error.read().unwrap().clone() {
            return Err(err);
        }
        Ok(self.credential.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_can_be_rotated_and_revoked() {
        let provider = MockCredentialProvider::with_token("first");
        assert_eq!(provider.current().await.unwrap().unwrap().expose(), "first");

        provider.set_token("second");
        assert_eq!(provider.current().await.unwrap().unwrap().expose(), "second");

        provider.sign_out();
        assert!(provider.current().await.unwrap().is_none());
        assert_eq!(provider.read_count(), 3);
    }

    #[tokio::test]
    async fn forced_error_is_returned() {
        let provider = MockCredentialProvider::with_token("tok").with_error(CredentialError::Expired);
        assert!(matches!(
            provider.current().await,
            Err(CredentialError::Expired)
        ));
    }
}
