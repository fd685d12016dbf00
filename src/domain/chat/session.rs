//! ChatSession aggregate - client-side state of one open chat view.
//!
//! A turn is dispatched in two phases:
//!
//! 1. [`ChatSession::begin_turn`] validates the text, takes the in-flight lock,
//!    appends the user turn, and hands back a [`DispatchTicket`].
//! 2. Once the backend call settles, [`ChatSession::settle_reply`] or
//!    [`ChatSession::settle_failure`] appends exactly one terminal assistant
//!    turn and releases the lock.
//!
//! Tickets capture the session epoch. Re-initializing or closing the session
//! bumps the epoch, so a call that settles afterwards is reported as
//! [`SettleOutcome::Stale`] and leaves the session untouched.

use super::chatbot::ChatbotSummary;
use super::dispatch::DispatchStatus;
use super::evidence::EvidencePresenter;
use super::message_log::MessageLog;
use super::turn::{AssistantReply, Turn};
use super::view::{SessionView, TurnView};
use crate::domain::foundation::{
    ChatbotId, ConversationId, DomainError, SessionId, StateMachine, Timestamp, TurnId,
};

/// Liveness token for a session incarnation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Proof that a turn was dispatched, required to settle it.
///
/// Deliberately not `Clone`: each ticket settles at most once.
#[derive(Debug)]
pub struct DispatchTicket {
    session_id: SessionId,
    epoch: SessionEpoch,
    chatbot_id: ChatbotId,
    user_turn_id: TurnId,
    message: String,
    conversation_id: Option<ConversationId>,
}

impl DispatchTicket {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn chatbot_id(&self) -> &ChatbotId {
        &self.chatbot_id
    }

    pub fn user_turn_id(&self) -> &TurnId {
        &self.user_turn_id
    }

    /// Text to send, exactly as the user typed it.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Conversation id current at dispatch time.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }
}

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// Text was empty after trimming.
    Blank,
    /// Another turn is still awaiting its reply.
    InFlight,
    /// The session was closed.
    Closed,
}

/// Result of phase one of a dispatch.
#[derive(Debug)]
pub enum BeginTurn {
    Dispatched(DispatchTicket),
    Ignored(IgnoredReason),
}

/// Result of phase two of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// A terminal turn was appended and the lock released.
    Applied {
        turn_id: TurnId,
        /// A reply carried a conversation id different from the frozen one.
        ignored_conversation_id: Option<ConversationId>,
    },
    /// The session was re-initialized or closed after dispatch.
    Stale,
}

/// Client-side state of one chat view.
///
/// # Invariants
///
/// - the log always starts with the welcome turn
/// - `conversation_id` is written at most once per incarnation
/// - at most one turn is in flight
/// - every dispatched turn produces exactly one terminal assistant turn,
///   unless the session is re-initialized or closed first
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    chatbot_id: ChatbotId,
    chatbot: Option<ChatbotSummary>,
    log: MessageLog,
    evidence: EvidencePresenter,
    conversation_id: Option<ConversationId>,
    status: DispatchStatus,
    epoch: SessionEpoch,
    closed: bool,
    next_seq: u64,
    opened_at: Timestamp,
}

impl ChatSession {
    /// Opens a session for `chatbot_id`, seeded with the welcome turn.
    pub fn open(chatbot_id: ChatbotId) -> Self {
        Self {
            id: SessionId::new(),
            chatbot_id,
            chatbot: None,
            log: MessageLog::seeded(),
            evidence: EvidencePresenter::new(),
            conversation_id: None,
            status: DispatchStatus::Idle,
            epoch: SessionEpoch::default(),
            closed: false,
            next_seq: 1,
            opened_at: Timestamp::now(),
        }
    }

    /// Re-seeds a fresh session for `chatbot_id`.
    ///
    /// Nothing carries over: turns, conversation id, expansion state, display
    /// metadata and the in-flight lock are all reset. A reply still pending
    /// from before will settle as stale.
    pub fn initialize(&mut self, chatbot_id: ChatbotId) {
        self.id = SessionId::new();
        self.chatbot_id = chatbot_id;
        self.chatbot = None;
        self.log.reset();
        self.evidence.clear();
        self.conversation_id = None;
        self.status = DispatchStatus::Idle;
        self.epoch = self.epoch.next();
        self.closed = false;
        self.next_seq = 1;
        self.opened_at = Timestamp::now();
    }

    /// Tears the session down. Pending replies settle as stale.
    pub fn close(&mut self) {
        self.closed = true;
        self.epoch = self.epoch.next();
        self.status = DispatchStatus::Idle;
    }

    /// Phase one: validate, lock, and optimistically append the user turn.
    ///
    /// Blank text, a pending reply, or a closed session make this a no-op.
    ///
    /// # Errors
    ///
    /// Only on broken invariants (duplicate turn id, illegal status change).
    pub fn begin_turn(&mut self, text: &str) -> Result<BeginTurn, DomainError> {
        if self.closed {
            return Ok(BeginTurn::Ignored(IgnoredReason::Closed));
        }
        if text.trim().is_empty() {
            return Ok(BeginTurn::Ignored(IgnoredReason::Blank));
        }
        if !self.status.accepts_submission() {
            return Ok(BeginTurn::Ignored(IgnoredReason::InFlight));
        }

        let status = self.status.transition_to(DispatchStatus::AwaitingReply)?;
        let user_turn_id = self.next_turn_id("user");
        self.log.append(Turn::user(user_turn_id.clone(), text))?;
        self.status = status;

        Ok(BeginTurn::Dispatched(DispatchTicket {
            session_id: self.id,
            epoch: self.epoch,
            chatbot_id: self.chatbot_id.clone(),
            user_turn_id,
            message: text.to_string(),
            conversation_id: self.conversation_id.clone(),
        }))
    }

    /// Phase two after a successful call.
    ///
    /// The first non-blank conversation id wins; later different ids are
    /// reported back but never stored.
    pub fn settle_reply(
        &mut self,
        ticket: DispatchTicket,
        reply: AssistantReply,
    ) -> Result<SettleOutcome, DomainError> {
        if !self.is_current(&ticket) {
            return Ok(SettleOutcome::Stale);
        }

        let mut ignored_conversation_id = None;
        if let Some(incoming) = reply.conversation_id.clone().filter(|c| !c.is_blank()) {
            match &self.conversation_id {
                None => self.conversation_id = Some(incoming),
                Some(current) if *current != incoming => ignored_conversation_id = Some(incoming),
                Some(_) => {}
            }
        }

        let turn_id = self.next_turn_id("assistant");
        self.finish(Turn::assistant(turn_id.clone(), reply))?;

        Ok(SettleOutcome::Applied {
            turn_id,
            ignored_conversation_id,
        })
    }

    /// Phase two after a failed call: append the apology turn.
    pub fn settle_failure(&mut self, ticket: DispatchTicket) -> Result<SettleOutcome, DomainError> {
        if !self.is_current(&ticket) {
            return Ok(SettleOutcome::Stale);
        }

        let turn_id = self.next_turn_id("error");
        self.finish(Turn::error(turn_id.clone()))?;

        Ok(SettleOutcome::Applied {
            turn_id,
            ignored_conversation_id: None,
        })
    }

    /// Records registry metadata if it still belongs to this incarnation.
    pub fn apply_chatbot(&mut self, epoch: SessionEpoch, chatbot: ChatbotSummary) -> bool {
        if self.closed || epoch != self.epoch || chatbot.id != self.chatbot_id {
            return false;
        }
        self.chatbot = Some(chatbot);
        true
    }

    /// Flips evidence visibility for a turn; returns the new state.
    pub fn toggle_evidence(&mut self, turn_id: &TurnId) -> bool {
        self.evidence.toggle(turn_id)
    }

    pub fn is_expanded(&self, turn_id: &TurnId) -> bool {
        self.evidence.is_expanded(turn_id)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let turns = self
            .log
            .iter()
            .map(|turn| TurnView {
                expanded: self.evidence.is_expanded(turn.id()),
                sources_label: self.evidence.sources_label(turn),
                turn: turn.clone(),
            })
            .collect();

        SessionView {
            title: self
                .chatbot
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Chatbot {}", self.chatbot_id)),
            description: self.chatbot.as_ref().and_then(|c| c.description.clone()),
            turns,
            awaiting_reply: self.status.is_in_flight(),
            conversation_id: self.conversation_id.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn chatbot_id(&self) -> &ChatbotId {
        &self.chatbot_id
    }

    pub fn chatbot(&self) -> Option<&ChatbotSummary> {
        self.chatbot.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn turns(&self) -> &[Turn] {
        self.log.turns()
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn status(&self) -> DispatchStatus {
        self.status
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.status.is_in_flight()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn opened_at(&self) -> &Timestamp {
        &self.opened_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn is_current(&self, ticket: &DispatchTicket) -> bool {
        !self.closed && ticket.epoch == self.epoch && ticket.session_id == self.id
    }

    fn next_turn_id(&mut self, prefix: &str) -> TurnId {
        let id = TurnId::sequenced(prefix, self.next_seq);
        self.next_seq += 1;
        id
    }

    fn finish(&mut self, turn: Turn) -> Result<(), DomainError> {
        let status = self.status.transition_to(DispatchStatus::Idle)?;
        self.log.append(turn)?;
        self.status = status;
        Ok(())
    }
}
