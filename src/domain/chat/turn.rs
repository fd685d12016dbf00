//! Turn entity and the retrieval evidence attached to assistant turns.
//!
//! Turns are immutable once created. Evidence items are owned by exactly
//! one assistant turn and never shared.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp, TurnId, ValidationError};

/// Greeting seeded as the first turn of every session.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. I can answer questions based on \
the documents uploaded to this chatbot. What would you like to know?";

/// Fixed content of the synthetic turn appended after a failed dispatch.
pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please make sure documents have \
been uploaded and processed, or try again later.";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Relevance score of a retrieval source, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Similarity(f64);

impl Similarity {
    /// Creates a similarity, rejecting values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("similarity", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Creates a similarity from a raw backend score, clamping into `[0, 1]`.
    ///
    /// Cosine scores can be slightly negative or drift above one through
    /// rounding; only non-finite values are rejected.
    pub fn clamped(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::invalid_format(
                "similarity",
                "score must be a finite number",
            ));
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Formats the score as a percentage with one decimal, e.g. `91.0%`.
    pub fn relevance_percent(&self) -> String {
        format!("{:.1}%", self.0 * 100.0)
    }
}

/// One retrieval source backing an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    document: String,
    similarity: Similarity,
    content_preview: String,
}

impl Evidence {
    pub fn new(
        document: impl Into<String>,
        similarity: Similarity,
        content_preview: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            similarity,
            content_preview: content_preview.into(),
        }
    }

    /// Human-readable label of the source document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn similarity(&self) -> Similarity {
        self.similarity
    }

    /// Short excerpt of the matched passage.
    pub fn content_preview(&self) -> &str {
        &self.content_preview
    }
}

/// Successful backend reply, already translated into domain values.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// Conversation id echoed or issued by the backend, if any.
    pub conversation_id: Option<ConversationId>,
    /// Backend's id for the stored assistant message.
    pub remote_id: Option<String>,
    pub content: String,
    pub tokens_used: Option<u32>,
    pub evidence: Vec<Evidence>,
}

impl AssistantReply {
    /// Creates a reply with only content set.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            remote_id: None,
            content: content.into(),
            tokens_used: None,
            evidence: Vec::new(),
        }
    }

    pub fn with_conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }

    pub fn with_remote_id(mut self, id: impl Into<String>) -> Self {
        self.remote_id = Some(id.into());
        self
    }

    pub fn with_tokens_used(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

/// One unit in the message log.
///
/// # Invariants
///
/// - `role` and `content` never change after construction
/// - error turns are assistant turns with the apology content and no evidence
/// - `tokens_used` and `context` only appear on successful assistant turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    role: Role,
    content: String,
    tokens_used: Option<u32>,
    context: Vec<Evidence>,
    is_error: bool,
    remote_id: Option<String>,
    created_at: Timestamp,
}

impl Turn {
    /// The greeting turn every session starts with.
    pub fn welcome() -> Self {
        Self::bare(TurnId::welcome(), Role::Assistant, WELCOME_MESSAGE)
    }

    /// A turn carrying the user's submitted text verbatim.
    pub fn user(id: TurnId, content: impl Into<String>) -> Self {
        Self::bare(id, Role::User, content)
    }

    /// An assistant turn built from a successful reply.
    pub fn assistant(id: TurnId, reply: AssistantReply) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: reply.content,
            tokens_used: reply.tokens_used,
            context: reply.evidence,
            is_error: false,
            remote_id: reply.remote_id,
            created_at: Timestamp::now(),
        }
    }

    /// The synthetic assistant turn appended after a failed dispatch.
    pub fn error(id: TurnId) -> Self {
        Self {
            is_error: true,
            ..Self::bare(id, Role::Assistant, APOLOGY_MESSAGE)
        }
    }

    fn bare(id: TurnId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            tokens_used: None,
            context: Vec::new(),
            is_error: false,
            remote_id: None,
            created_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tokens_used(&self) -> Option<u32> {
        self.tokens_used
    }

    /// Evidence backing this turn; empty means there are no sources to show.
    pub fn context(&self) -> &[Evidence] {
        &self.context
    }

    pub fn has_evidence(&self) -> bool {
        !self.context.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}
