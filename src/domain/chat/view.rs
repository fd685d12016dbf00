//! Read-only snapshot of a session for rendering.

use super::turn::Turn;
use crate::domain::foundation::ConversationId;

/// A turn plus its presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnView {
    pub turn: Turn,
    pub expanded: bool,
    /// `"Show Sources (n)"` / `"Hide Sources (n)"`, absent without evidence.
    pub sources_label: Option<String>,
}

/// Everything a front end needs to draw one chat view.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Chatbot name, or a placeholder when metadata is unavailable.
    pub title: String,
    pub description: Option<String>,
    pub turns: Vec<TurnView>,
    /// True while a reply is pending ("Thinking..." indicator).
    pub awaiting_reply: bool,
    pub conversation_id: Option<ConversationId>,
}

impl SessionView {
    /// Whether the send control should be enabled for `draft`.
    pub fn can_submit(&self, draft: &str) -> bool {
        !self.awaiting_reply && !draft.trim().is_empty()
    }

    /// Footer line describing the conversation.
    pub fn footer(&self) -> String {
        let base = "Answers are generated from the documents uploaded to this chatbot.";
        match &self.conversation_id {
            Some(id) => format!("{} • Conversation ID: {}", base, id),
            None => base.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_view(awaiting_reply: bool) -> SessionView {
        SessionView {
            title: "Support".to_string(),
            description: None,
            turns: vec![TurnView {
                turn: Turn::welcome(),
                expanded: false,
                sources_label: None,
            }],
            awaiting_reply,
            conversation_id: None,
        }
    }

    #[test]
    fn submit_disabled_for_blank_draft() {
        assert!(!empty_view(false).can_submit("   "));
        assert!(empty_view(false).can_submit("hi"));
    }

    #[test]
    fn submit_disabled_while_awaiting_reply() {
        assert!(!empty_view(true).can_submit("hi"));
    }

    #[test]
    fn footer_mentions_conversation_id_once_known() {
        let mut view = empty_view(false);
        assert!(!view.footer().contains("Conversation ID"));
        view.conversation_id = Some(ConversationId::number(12));
        assert!(view.footer().ends_with("Conversation ID: 12"));
    }
}
