//! Chat domain module.
//!
//! Client-side state of a conversation with a retrieval-augmented chatbot:
//! the message log, the in-flight dispatch lock, evidence visibility, and
//! the draft composer.

mod chatbot;
mod composer;
mod dispatch;
mod evidence;
mod message_log;
mod session;
mod turn;
mod view;

pub use chatbot::ChatbotSummary;
pub use composer::{Composer, ComposerAction, Key, KeyPress, Modifiers};
pub use dispatch::DispatchStatus;
pub use evidence::EvidencePresenter;
pub use message_log::MessageLog;
pub use session::{
    BeginTurn, ChatSession, DispatchTicket, IgnoredReason, SessionEpoch, SettleOutcome,
};
pub use turn::{
    AssistantReply, Evidence, Role, Similarity, Turn, APOLOGY_MESSAGE, WELCOME_MESSAGE,
};
pub use view::{SessionView, TurnView};
