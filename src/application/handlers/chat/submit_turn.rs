//! SubmitTurn command handler.
//!
//! Drives one user submission through both dispatch phases:
//!
//! 1. Under the session lock: validate, take the in-flight lock, append the
//!    user turn.
//! 2. Without the lock: read the credential and call the backend.
//! 3. Under the lock again: append the reply or the apology turn, unless the
//!    session was re-initialized or closed in the meantime.
//!
//! Backend failures never escape as `Err`; they become an apology turn in
//! the log and a [`SubmitTurnOutcome::Failed`] for the caller.

use std::sync::Arc;

use crate::domain::chat::{BeginTurn, IgnoredReason, SettleOutcome};
use crate::domain::foundation::{DomainError, TurnId};
use crate::ports::{ChatBackend, ChatBackendError, ChatRequest, CredentialProvider};

use super::{read_credential, SharedSession};

/// Command carrying the composer's draft.
#[derive(Debug, Clone)]
pub struct SubmitTurnCommand {
    /// Draft text, sent as typed if it is not blank.
    pub text: String,
}

impl SubmitTurnCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What happened to a submission.
#[derive(Debug, Clone)]
pub enum SubmitTurnOutcome {
    /// Nothing was appended and nothing was sent.
    Ignored(IgnoredReason),
    /// The assistant's reply was appended.
    Answered { user_turn: TurnId, reply_turn: TurnId },
    /// The call failed and the apology turn was appended.
    Failed {
        user_turn: TurnId,
        error_turn: TurnId,
        cause: ChatBackendError,
    },
    /// The session moved on before the call settled; the result was dropped.
    Discarded { user_turn: TurnId },
}

impl SubmitTurnOutcome {
    /// True if a request was sent to the backend.
    pub fn was_dispatched(&self) -> bool {
        !matches!(self, SubmitTurnOutcome::Ignored(_))
    }
}

/// Handler for user submissions.
pub struct SubmitTurnHandler<B, C>
where
    B: ChatBackend,
    C: CredentialProvider,
{
    backend: Arc<B>,
    credentials: Arc<C>,
}

impl<B, C> SubmitTurnHandler<B, C>
where
    B: ChatBackend,
    C: CredentialProvider,
{
    pub fn new(backend: Arc<B>, credentials: Arc<C>) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    /// Handles a submission.
    ///
    /// # Errors
    ///
    /// Only when a session invariant is broken; never for backend failures.
    pub async fn handle(
        &self,
        session: &SharedSession,
        cmd: SubmitTurnCommand,
    ) -> Result<SubmitTurnOutcome, DomainError> {
        let ticket = {
            let mut session = session.lock().await;
            match session.begin_turn(&cmd.text)? {
                BeginTurn::Dispatched(ticket) => ticket,
                BeginTurn::Ignored(reason) => {
                    tracing::debug!(?reason, "submission ignored");
                    return Ok(SubmitTurnOutcome::Ignored(reason));
                }
            }
        };

        let user_turn = ticket.user_turn_id().clone();
        let credential = read_credential(self.credentials.as_ref()).await;
        let request = ChatRequest::for_ticket(&ticket, credential);

        tracing::info!(
            session_id = %ticket.session_id(),
            chatbot_id = %ticket.chatbot_id(),
            turn_id = %user_turn,
            conversation_id = %ticket
                .conversation_id()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            "dispatching turn"
        );

        let result = self.backend.send(request).await;

        let mut session = session.lock().await;
        let (settled, cause) = match result {
            Ok(reply) => (session.settle_reply(ticket, reply)?, None),
            Err(err) => {
                tracing::warn!(
                    turn_id = %user_turn,
                    error = %err,
                    kind = err.kind(),
                    "chat request failed"
                );
                (session.settle_failure(ticket)?, Some(err))
            }
        };

        let outcome = match (settled, cause) {
            (SettleOutcome::Stale, _) => {
                tracing::debug!(turn_id = %user_turn, "discarding reply for a superseded session");
                SubmitTurnOutcome::Discarded { user_turn }
            }
            (
                SettleOutcome::Applied {
                    turn_id,
                    ignored_conversation_id,
                },
                None,
            ) => {
                if let Some(ignored) = ignored_conversation_id {
                    tracing::warn!(
                        kept = ?session.conversation_id().map(|c| c.to_string()),
                        ignored = %ignored,
                        "backend issued a different conversation id; keeping the first"
                    );
                }
                tracing::info!(turn_id = %turn_id, "reply received");
                SubmitTurnOutcome::Answered {
                    user_turn,
                    reply_turn: turn_id,
                }
            }
            (SettleOutcome::Applied { turn_id, .. }, Some(cause)) => SubmitTurnOutcome::Failed {
                user_turn,
                error_turn: turn_id,
                cause,
            },
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockChatBackend, MockCredentialProvider};
    use crate::domain::chat::{AssistantReply, ChatSession, Evidence, Similarity, APOLOGY_MESSAGE};
    use crate::domain::foundation::{ChatbotId, ConversationId};
    use tokio::sync::Mutex;

    type Handler = SubmitTurnHandler<MockChatBackend, MockCredentialProvider>;

    fn setup(backend: MockChatBackend) -> (Handler, SharedSession, MockChatBackend) {
        let handler = SubmitTurnHandler::new(
            Arc::new(backend.clone()),
            Arc::new(MockCredentialProvider::with_token("tok")),
        );
        let session = Arc::new(Mutex::new(ChatSession::open(ChatbotId::new("3").unwrap())));
        (handler, session, backend)
    }

    fn refund_reply() -> AssistantReply {
        AssistantReply::new("Refunds are accepted within 30 days.")
            .with_conversation_id(ConversationId::number(42))
            .with_tokens_used(120)
            .with_evidence(Evidence::new(
                "policy.pdf",
                Similarity::new(0.91).unwrap(),
                "Refunds are accepted...",
            ))
    }

    mod success {
        use super::*;

        #[tokio::test]
        async fn appends_user_and_reply_turns() {
            let (handler, session, backend) =
                setup(MockChatBackend::new().with_reply(refund_reply()));

            let outcome = handler
                .handle(&session, SubmitTurnCommand::new("What is the refund window?"))
                .await
                .unwrap();

            assert!(matches!(outcome, SubmitTurnOutcome::Answered { .. }));
            let s = session.lock().await;
            assert_eq!(s.turns().len(), 3);
            assert_eq!(s.turns()[1].content(), "What is the refund window?");
            assert_eq!(s.turns()[2].content(), "Refunds are accepted within 30 days.");
            assert_eq!(s.turns()[2].tokens_used(), Some(120));
            assert_eq!(s.conversation_id(), Some(&ConversationId::number(42)));
            assert!(!s.is_awaiting_reply());
            assert_eq!(backend.call_count(), 1);
        }

        #[tokio::test]
        async fn attaches_credential_and_conversation_id() {
            let (handler, session, backend) = setup(
                MockChatBackend::new()
                    .with_reply(refund_reply())
                    .with_text_reply("Digital goods are not refundable."),
            );

            handler.handle(&session, SubmitTurnCommand::new("first")).await.unwrap();
            handler.handle(&session, SubmitTurnCommand::new("second")).await.unwrap();

            let calls = backend.get_calls();
            assert!(calls[0].conversation_id.is_none());
            assert_eq!(calls[1].conversation_id, Some(ConversationId::number(42)));
            assert_eq!(calls[1].credential.as_ref().unwrap().expose(), "tok");
        }

        #[tokio::test]
        async fn later_conversation_id_is_ignored() {
            let (handler, session, _) = setup(
                MockChatBackend::new()
                    .with_reply(refund_reply())
                    .with_reply(
                        AssistantReply::new("again").with_conversation_id(ConversationId::number(99)),
                    ),
            );

            handler.handle(&session, SubmitTurnCommand::new("one")).await.unwrap();
            handler.handle(&session, SubmitTurnCommand::new("two")).await.unwrap();

            assert_eq!(
                session.lock().await.conversation_id(),
                Some(&ConversationId::number(42))
            );
        }
    }

    mod failure {
        use super::*;

        #[tokio::test]
        async fn backend_error_appends_apology() {
            let (handler, session, _) = setup(
                MockChatBackend::new().with_error(ChatBackendError::Timeout { timeout_secs: 60 }),
            );

            let outcome = handler
                .handle(&session, SubmitTurnCommand::new("Hello"))
                .await
                .unwrap();

            match outcome {
                SubmitTurnOutcome::Failed { cause, .. } => {
                    assert!(matches!(cause, ChatBackendError::Timeout { .. }))
                }
                other => panic!("unexpected outcome: {:?}", other),
            }
            let s = session.lock().await;
            assert_eq!(s.turns().len(), 3);
            assert!(s.turns()[2].is_error());
            assert_eq!(s.turns()[2].content(), APOLOGY_MESSAGE);
            assert!(s.conversation_id().is_none());
            assert!(!s.is_awaiting_reply());
        }
    }

    mod ignored {
        use super::*;

        #[tokio::test]
        async fn blank_text_is_not_sent() {
            let (handler, session, backend) = setup(MockChatBackend::new());

            let outcome = handler
                .handle(&session, SubmitTurnCommand::new("   "))
                .await
                .unwrap();

            assert!(matches!(outcome, SubmitTurnOutcome::Ignored(IgnoredReason::Blank)));
            assert!(!outcome.was_dispatched());
            assert_eq!(session.lock().await.turns().len(), 1);
            assert_eq!(backend.call_count(), 0);
        }

        #[tokio::test]
        async fn submission_while_in_flight_is_ignored() {
            let (backend, gate) = MockChatBackend::new().with_text_reply("done").with_gate();
            let (handler, session, backend) = setup(backend);
            let handler = Arc::new(handler);

            let first = tokio::spawn({
                let handler = handler.clone();
                let session = session.clone();
                async move { handler.handle(&session, SubmitTurnCommand::new("first")).await }
            });
            backend.wait_for_calls(1).await;

            let second = handler
                .handle(&session, SubmitTurnCommand::new("second"))
                .await
                .unwrap();
            assert!(matches!(second, SubmitTurnOutcome::Ignored(IgnoredReason::InFlight)));
            assert_eq!(session.lock().await.turns().len(), 2);

            gate.notify_one();
            first.await.unwrap().unwrap();

            assert_eq!(session.lock().await.turns().len(), 3);
            assert_eq!(backend.call_count(), 1);
        }
    }

    mod stale {
        use super::*;

        #[tokio::test]
        async fn reply_after_reinitialize_is_discarded() {
            let (backend, gate) = MockChatBackend::new().with_reply(refund_reply()).with_gate();
            let (handler, session, backend) = setup(backend);
            let handler = Arc::new(handler);

            let pending = tokio::spawn({
                let handler = handler.clone();
                let session = session.clone();
                async move { handler.handle(&session, SubmitTurnCommand::new("hello")).await }
            });
            backend.wait_for_calls(1).await;

            session
                .lock()
                .await
                .initialize(ChatbotId::new("7").unwrap());
            gate.notify_one();

            let outcome = pending.await.unwrap().unwrap();
            assert!(matches!(outcome, SubmitTurnOutcome::Discarded { .. }));

            let s = session.lock().await;
            assert_eq!(s.turns().len(), 1);
            assert!(s.conversation_id().is_none());
        }
    }
}
