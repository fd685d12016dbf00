//! Credential provider chosen at startup.

use async_trait::async_trait;

use super::{StaticCredential, TokenFileCredential};
use crate::ports::{Credential, CredentialError, CredentialProvider};

/// One of the concrete credential sources, picked from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredCredential {
    Static(StaticCredential),
    TokenFile(TokenFileCredential),
}

impl Default for ConfiguredCredential {
    fn default() -> Self {
        ConfiguredCredential::Static(StaticCredential::anonymous())
    }
}

#[async_trait]
impl CredentialProvider for ConfiguredCredential {
    async fn current(&self) -> Result<Option<Credential>, CredentialError> {
        match self {
            ConfiguredCredential::Static(provider) => provider.current().await,
            ConfiguredCredential::TokenFile(provider) => provider.current().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_is_anonymous() {
        assert!(ConfiguredCredential::default().current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delegates_to_token_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "from-file").unwrap();

        let provider = ConfiguredCredential::TokenFile(TokenFileCredential::new(file.path()));

        assert_eq!(provider.current().await.unwrap().unwrap().expose(), "from-file");
    }
}
