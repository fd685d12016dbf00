//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! [`ChatSessionController`] bundles the handlers behind one shared session.

pub mod controller;
pub mod handlers;

pub use controller::{ChatSessionController, KeyOutcome};
pub use handlers::{
    OpenSessionCommand, OpenSessionHandler, OpenSessionResult, SharedSession, SubmitTurnCommand,
    SubmitTurnHandler, SubmitTurnOutcome, ToggleEvidenceCommand, ToggleEvidenceHandler,
};
