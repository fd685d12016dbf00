//! Credential read from a file on every request.
//!
//! Lets an external login helper rotate the token without restarting the
//! client. A missing or empty file means the user is signed out.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{Credential, CredentialError, CredentialProvider};

#[derive(Debug, Clone)]
pub struct TokenFileCredential {
    path: PathBuf,
}

impl TokenFileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for TokenFileCredential {
    async fn current(&self) -> Result<Option<Credential>, CredentialError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Credential::bearer(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "token file absent");
                Ok(None)
            }
            Err(e) => Err(CredentialError::unavailable(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
