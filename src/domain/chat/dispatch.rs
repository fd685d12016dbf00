//! Dispatch status: the in-flight lock of a chat session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Whether a session currently has an outbound request pending.
///
/// - `Idle`: no request pending, submissions are accepted
/// - `AwaitingReply`: one request pending, submissions are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    #[default]
    Idle,
    AwaitingReply,
}

impl DispatchStatus {
    /// Returns true if a new turn may be dispatched.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::AwaitingReply)
    }
}

impl StateMachine for DispatchStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DispatchStatus::*;
        matches!((self, target), (Idle, AwaitingReply) | (AwaitingReply, Idle))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DispatchStatus::*;
        match self {
            Idle => vec![AwaitingReply],
            AwaitingReply => vec![Idle],
        }
    }
}
