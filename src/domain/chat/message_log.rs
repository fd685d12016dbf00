//! Ordered, append-only record of the turns exchanged in one session.

use std::collections::HashSet;

use super::turn::Turn;
use crate::domain::foundation::{DomainError, ErrorCode, TurnId};

/// Append-only turn sequence.
///
/// Turns are never edited or removed. The only way to shrink the log is
/// [`MessageLog::reset`], which the session uses on re-initialization.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Vec<Turn>,
    ids: HashSet<TurnId>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log holding only the welcome turn.
    pub fn seeded() -> Self {
        let mut log = Self::new();
        log.reset();
        log
    }

    /// Appends a turn at the end.
    ///
    /// # Errors
    ///
    /// - `DuplicateTurn` if a turn with the same id is already logged
    pub fn append(&mut self, turn: Turn) -> Result<(), DomainError> {
        if self.ids.contains(turn.id()) {
            return Err(DomainError::new(
                ErrorCode::DuplicateTurn,
                "A turn with this id is already in the log",
            )
            .with_detail("turn_id", turn.id().to_string()));
        }
        self.ids.insert(turn.id().clone());
        self.turns.push(turn);
        Ok(())
    }

    /// Discards every turn and re-seeds the welcome turn.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.ids.clear();
        let welcome = Turn::welcome();
        self.ids.insert(welcome.id().clone());
        self.turns.push(welcome);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Looks a turn up by id.
    pub fn get(&self, id: &TurnId) -> Option<&Turn> {
        if !self.ids.contains(id) {
            return None;
        }
        self.turns.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: &TurnId) -> bool {
        self.ids.contains(id)
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
