//! Expanded/collapsed display state of each assistant turn's evidence list.

use std::collections::HashMap;

use super::turn::Turn;
use crate::domain::foundation::TurnId;

/// Per-turn evidence visibility, keyed by turn id.
///
/// Absent entries read as collapsed. The map is independent of the message
/// log's content and is only cleared by session re-initialization.
#[derive(Debug, Clone, Default)]
pub struct EvidencePresenter {
    expanded: HashMap<TurnId, bool>,
}

impl EvidencePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `turn_id` and returns the new value.
    ///
    /// The first toggle of an unseen id always expands.
    pub fn toggle(&mut self, turn_id: &TurnId) -> bool {
        let entry = self.expanded.entry(turn_id.clone()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_expanded(&self, turn_id: &TurnId) -> bool {
        self.expanded.get(turn_id).copied().unwrap_or(false)
    }

    /// Label for the show/hide control, `None` when the turn has no sources.
    pub fn sources_label(&self, turn: &Turn) -> Option<String> {
        if !turn.has_evidence() {
            return None;
        }
        let verb = if self.is_expanded(turn.id()) { "Hide" } else { "Show" };
        Some(format!("{} Sources ({})", verb, turn.context().len()))
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// Number of turns that have ever been toggled.
    pub fn tracked(&self) -> usize {
        self.expanded.len()
    }
}
