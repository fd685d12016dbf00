//! Mock Chat Backend for testing.
//!
//! Provides a configurable implementation of the `ChatBackend` port so the
//! session controller can be exercised without a running service.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Error injection
//! - Simulated latency, or a gate that holds replies until released
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockChatBackend::new()
//!     .with_reply(AssistantReply::new("Refunds take 30 days.")
//!         .with_conversation_id(ConversationId::number(42)));
//!
//! let reply = backend.send(request).await?;
//! assert_eq!(backend.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;

use crate::domain::chat::AssistantReply;
use crate::ports::{ChatBackend, ChatBackendError, ChatRequest};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockChatResponse {
    Reply(AssistantReply),
    Error(ChatBackendError),
}

/// Mock chat backend for testing.
#[derive(Debug, Clone, Default)]
pub struct MockChatBackend {
    responses: Arc<Mutex<VecDeque<MockChatResponse>>>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: AssistantReply) -> Self {
        self.push(MockChatResponse::Reply(reply));
        self
    }

    /// Queues a reply with only content set.
    pub fn with_text_reply(self, content: impl Into<String>) -> Self {
        self.with_reply(AssistantReply::new(content))
    }

    /// Queues a failure.
    pub fn with_error(self, error: ChatBackendError) -> Self {
        self.push(MockChatResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Holds every reply until the returned handle is notified.
    ///
    /// Each `notify_one()` releases one pending (or the next) call.
    pub fn with_gate(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Queues a response after construction.
    pub fn push(&self, response: MockChatResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Returns the number of calls made to this backend.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Waits until at least `count` calls have been recorded.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.call_count() < count {
            sleep(Duration::from_millis(2)).await;
        }
    }

    fn next_response(&self) -> MockChatResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockChatResponse::Reply(AssistantReply::new("Mock response")))
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn send(&self, request: ChatRequest) -> Result<AssistantReply, ChatBackendError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.next_response() {
            MockChatResponse::Reply(reply) => Ok(reply),
            MockChatResponse::Error(err) => Err(err),
        }
    }
}
