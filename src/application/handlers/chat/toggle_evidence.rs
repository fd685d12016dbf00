//! ToggleEvidence command handler.

use crate::domain::foundation::{DomainError, ErrorCode, TurnId};

use super::SharedSession;

/// Command to show or hide the sources of one turn.
#[derive(Debug, Clone)]
pub struct ToggleEvidenceCommand {
    pub turn_id: TurnId,
}

impl ToggleEvidenceCommand {
    pub fn new(turn_id: TurnId) -> Self {
        Self { turn_id }
    }
}

/// Handler for evidence visibility toggles.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToggleEvidenceHandler;

impl ToggleEvidenceHandler {
    pub fn new() -> Self {
        Self
    }

    /// Flips the turn's evidence visibility and returns the new state.
    ///
    /// # Errors
    ///
    /// `TurnNotFound` if the turn is not in the current log.
    pub async fn handle(
        &self,
        session: &SharedSession,
        cmd: ToggleEvidenceCommand,
    ) -> Result<bool, DomainError> {
        let mut session = session.lock().await;
        if !session.log().contains(&cmd.turn_id) {
            return Err(DomainError::new(
                ErrorCode::TurnNotFound,
                format!("No turn '{}' in this session", cmd.turn_id),
            ));
        }
        Ok(session.toggle_evidence(&cmd.turn_id))
    }
}
