//! Chat Backend Adapters.
//!
//! - `HttpChatBackend` - the service's REST chat endpoint
//! - `MockChatBackend` - configurable mock for testing

mod http_backend;
mod mock_backend;
mod wire;

pub use http_backend::HttpChatBackend;
pub use mock_backend::{MockChatBackend, MockChatResponse};
