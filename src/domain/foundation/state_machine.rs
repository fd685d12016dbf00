//! State machine trait for status enums.
//!
//! Gives lifecycle enums a uniform way to declare their legal transitions
//! and to reject everything else with an `InvalidStateTransition` error.

use super::{DomainError, ErrorCode};

/// Trait for status enums that represent state machines.
///
/// ```ignore
/// impl StateMachine for DispatchStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, AwaitingReply) | (AwaitingReply, Idle))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> { ... }
/// }
///
/// let next = status.transition_to(DispatchStatus::AwaitingReply)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
