//! Application handlers.
//!
//! Command handlers that orchestrate domain operations and ports.

pub mod chat;

pub use chat::{
    OpenSessionCommand, OpenSessionHandler, OpenSessionResult, SharedSession, SubmitTurnCommand,
    SubmitTurnHandler, SubmitTurnOutcome, ToggleEvidenceCommand, ToggleEvidenceHandler,
};
