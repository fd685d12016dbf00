//! Chat Backend Port - the retrieval-augmented chat endpoint.
//!
//! One call per user turn. The session does not care why a call failed; the
//! error variants exist for logging and for adapters' own bookkeeping.
//!
//! # Example
//!
//! ```ignore
//! struct EchoBackend;
//!
//! #[async_trait]
//! impl ChatBackend for EchoBackend {
//!     async fn send(&self, request: ChatRequest) -> Result<AssistantReply, ChatBackendError> {
//!         Ok(AssistantReply::new(request.message))
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use super::Credential;
use crate::domain::chat::{AssistantReply, DispatchTicket};
use crate::domain::foundation::{ChatbotId, ConversationId};

/// One outbound chat request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Chatbot the message is addressed to.
    pub chatbot_id: ChatbotId,
    /// User text, as typed.
    pub message: String,
    /// Conversation to continue, absent on the first turn.
    pub conversation_id: Option<ConversationId>,
    /// Bearer credential read at dispatch time.
    pub credential: Option<Credential>,
}

impl ChatRequest {
    pub fn new(chatbot_id: ChatbotId, message: impl Into<String>) -> Self {
        Self {
            chatbot_id,
            message: message.into(),
            conversation_id: None,
            credential: None,
        }
    }

    /// Builds the request for a dispatched turn.
    pub fn for_ticket(ticket: &DispatchTicket, credential: Option<Credential>) -> Self {
        Self {
            chatbot_id: ticket.chatbot_id().clone(),
            message: ticket.message().to_string(),
            conversation_id: ticket.conversation_id().cloned(),
            credential,
        }
    }

    pub fn with_conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Chat backend errors.
#[derive(Debug, Clone, Error)]
pub enum ChatBackendError {
    /// Connection failed or the request could not be sent.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Backend rejected the credential.
    #[error("not authenticated")]
    Unauthorized,

    /// Backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected schema.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// Client could not be constructed from its configuration.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl ChatBackendError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReply(message.into())
    }

    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatBackendError::Network(_) => "network",
            ChatBackendError::Timeout { .. } => "timeout",
            ChatBackendError::Unauthorized => "unauthorized",
            ChatBackendError::Status { .. } => "status",
            ChatBackendError::MalformedReply(_) => "malformed_reply",
            ChatBackendError::Configuration(_) => "configuration",
        }
    }
}

/// Port for the chat endpoint.
///
/// Implementations must not retry: each call is exactly one attempt.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one user turn and returns the assistant's reply.
    async fn send(&self, request: ChatRequest) -> Result<AssistantReply, ChatBackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{BeginTurn, ChatSession};

    #[test]
    fn request_for_ticket_copies_dispatch_state() {
        let mut session = ChatSession::open(ChatbotId::new("3").unwrap());
        let ticket = match session.begin_turn("hello").unwrap() {
            BeginTurn::Dispatched(ticket) => ticket,
            BeginTurn::Ignored(reason) => panic!("ignored: {:?}", reason),
        };

        let request = ChatRequest::for_ticket(&ticket, Credential::bearer("tok"));

        assert_eq!(request.chatbot_id.as_str(), "3");
        assert_eq!(request.message, "hello");
        assert!(request.conversation_id.is_none());
        assert!(request.credential.is_some());
    }

    #[test]
    fn builder_sets_optional_fields() {
        let request = ChatRequest::new(ChatbotId::new("3").unwrap(), "hi")
            .with_conversation_id(ConversationId::number(9));
        assert_eq!(request.conversation_id, Some(ConversationId::number(9)));
        assert!(request.credential.is_none());
    }

    #[test]
    fn error_kind_labels() {
        assert_eq!(ChatBackendError::network("x").kind(), "network");
        assert_eq!(ChatBackendError::Timeout { timeout_secs: 5 }.kind(), "timeout");
        assert_eq!(ChatBackendError::malformed("x").kind(), "malformed_reply");
    }

    #[test]
    fn error_displays_correctly() {
        assert_eq!(
            ChatBackendError::status(500, "boom").to_string(),
            "backend returned 500: boom"
        );
        assert_eq!(
            ChatBackendError::Timeout { timeout_secs: 30 }.to_string(),
            "request timed out after 30s"
        );
    }
}
