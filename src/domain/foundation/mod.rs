//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types, and the state machine
//! trait that form the vocabulary of the chat client domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChatbotId, ConversationId, OpaqueToken, SessionId, TurnId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
