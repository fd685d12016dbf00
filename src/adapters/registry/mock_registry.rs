//! Mock chatbot registry for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::chat::ChatbotSummary;
use crate::domain::foundation::ChatbotId;
use crate::ports::{ChatbotRegistry, Credential, RegistryError};

/// In-memory registry. Unknown ids return `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MockChatbotRegistry {
    chatbots: Arc<RwLock<HashMap<ChatbotId, ChatbotSummary>>>,
    force_error: Arc<RwLock<Option<RegistryError>>>,
    lookups: Arc<RwLock<Vec<ChatbotId>>>,
}

impl MockChatbotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chatbot.
    pub fn with_chatbot(self, summary: ChatbotSummary) -> Self {
        self.chatbots
            .write()
            .unwrap()
            .insert(summary.id.clone(), summary);
        self
    }

    /// Forces all lookups to return the specified error.
    pub fn with_error(self, error: RegistryError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Ids looked up so far, in order.
    pub fn lookups(&self) -> Vec<ChatbotId> {
        self.lookups.read().unwrap().clone()
    }
}

#[async_trait]
impl ChatbotRegistry for MockChatbotRegistry {
    async fn fetch(
        &self,
        id: &ChatbotId,
        _credential: Option<&Credential>,
    ) -> Result<ChatbotSummary, RegistryError> {
        self.lookups.write().unwrap().push(id.clone());

        if let Some(err) = self.force_error.read().unwrap().clone() {
            return Err(err);
        }

        self.chatbots
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }
}
