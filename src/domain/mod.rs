//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `chat` - Chat session aggregate, message log, evidence presenter, composer

pub mod chat;
pub mod foundation;
