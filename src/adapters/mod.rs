//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the chat domain to external systems:
//! - `chat` - Chat backend (HTTP, mock)
//! - `registry` - Chatbot metadata lookup (HTTP, mock)
//! - `auth` - Bearer credential sources
//! - `connection` - Shared HTTP settings

pub mod auth;
pub mod chat;
pub mod connection;
pub mod registry;

pub use auth::{ConfiguredCredential, MockCredentialProvider, StaticCredential, TokenFileCredential};
pub use chat::{HttpChatBackend, MockChatBackend, MockChatResponse};
pub use connection::{ConnectionConfig, DEFAULT_BASE_URL};
pub use registry::{HttpChatbotRegistry, MockChatbotRegistry};
