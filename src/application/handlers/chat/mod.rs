//! Chat session command handlers.
//!
//! Each handler works on a [`SharedSession`]. The mutex is only held for
//! the synchronous domain steps, never across a backend or registry call.

mod open_session;
mod submit_turn;
mod toggle_evidence;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::chat::ChatSession;
use crate::ports::{Credential, CredentialProvider};

pub use open_session::{OpenSessionCommand, OpenSessionHandler, OpenSessionResult};
pub use submit_turn::{SubmitTurnCommand, SubmitTurnHandler, SubmitTurnOutcome};
pub use toggle_evidence::{ToggleEvidenceCommand, ToggleEvidenceHandler};

/// Session state shared between the controller and in-flight dispatches.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Reads the current credential; an unreadable source means anonymous.
pub(crate) async fn read_credential<C>(credentials: &C) -> Option<Credential>
where
    C: CredentialProvider + ?Sized,
{
    match credentials.current().await {
        Ok(credential) => credential,
        Err(err) => {
            tracing::warn!(error = %err, "credential unavailable; sending request anonymously");
            None
        }
    }
}
