//! Display metadata for the chatbot a session talks to.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ChatbotId;

/// Read-only chatbot metadata from the registry.
///
/// Used for display only; never affects conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotSummary {
    pub id: ChatbotId,
    pub name: String,
    pub description: Option<String>,
}

impl ChatbotSummary {
    pub fn new(id: ChatbotId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
