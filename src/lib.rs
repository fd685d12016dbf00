//! RagChat Client - chat session controller for retrieval-augmented chatbots
//!
//! Keeps the client side of a conversation with a document-grounded chatbot:
//! the ordered message log, the one-request-at-a-time dispatch lock, the
//! server-issued conversation id, and per-turn visibility of the retrieved
//! sources backing each answer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
