//! Chatbot Registry Port - read-only chatbot metadata lookup.
//!
//! Looked up once per session initialization, for display only. A failed
//! lookup never blocks the chat flow.

use async_trait::async_trait;
use thiserror::Error;

use super::Credential;
use crate::domain::chat::ChatbotSummary;
use crate::domain::foundation::ChatbotId;

/// Registry lookup errors.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("chatbot not found: {0}")]
    NotFound(ChatbotId),

    #[error("not authorized to view chatbot")]
    Unauthorized,

    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("malformed registry response: {0}")]
    Malformed(String),
}

impl RegistryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Port for fetching chatbot display metadata.
#[async_trait]
pub trait ChatbotRegistry: Send + Sync {
    async fn fetch(
        &self,
        id: &ChatbotId,
        credential: Option<&Credential>,
    ) -> Result<ChatbotSummary, RegistryError>;
}
