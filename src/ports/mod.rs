//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the chat domain and its collaborators. Adapters implement these ports.
//!
//! - `ChatBackend` - the retrieval-augmented chat endpoint (one call per turn)
//! - `ChatbotRegistry` - read-only chatbot metadata for display
//! - `CredentialProvider` - bearer credential, read fresh per request

mod chat_backend;
mod chatbot_registry;
mod credential_provider;

pub use chat_backend::{ChatBackend, ChatBackendError, ChatRequest};
pub use chatbot_registry::{ChatbotRegistry, RegistryError};
pub use credential_provider::{Credential, CredentialError, CredentialProvider};
