//! Chatbot Registry Adapters.
//!
//! - `HttpChatbotRegistry` - the service's chatbot detail endpoint
//! - `MockChatbotRegistry` - in-memory registry for testing

mod http_registry;
mod mock_registry;

pub use http_registry::HttpChatbotRegistry;
pub use mock_registry::MockChatbotRegistry;
