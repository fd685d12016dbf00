//! ChatSessionController - the surface a UI drives.
//!
//! Owns one [`SharedSession`] and the handlers that act on it. Every method
//! takes `&self`, so a UI can keep submitting, toggling and rendering while
//! a reply is pending.
//!
//! # Example
//!
//! ```ignore
//! let controller = ChatSessionController::new(chatbot_id, backend, registry, credentials);
//! controller.open(chatbot_id).await;
//!
//! controller.submit("What is the refund window?").await?;
//! for turn in controller.view().await.turns {
//!     println!("{}", turn.turn.content());
//! }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;

use super::handlers::{
    OpenSessionCommand, OpenSessionHandler, OpenSessionResult, SharedSession, SubmitTurnCommand,
    SubmitTurnHandler, SubmitTurnOutcome, ToggleEvidenceCommand, ToggleEvidenceHandler,
};
use crate::domain::chat::{ChatSession, Composer, ComposerAction, KeyPress, SessionView};
use crate::domain::foundation::{ChatbotId, DomainError, TurnId};
use crate::ports::{ChatBackend, ChatbotRegistry, CredentialProvider};

/// What a key press in the composer led to.
#[derive(Debug, Clone)]
pub enum KeyOutcome {
    /// The draft changed; nothing was sent.
    Edited,
    /// The draft was submitted.
    Submitted(SubmitTurnOutcome),
}

/// Controller for one chat view.
pub struct ChatSessionController<B, G, C>
where
    B: ChatBackend,
    G: ChatbotRegistry,
    C: CredentialProvider,
{
    session: SharedSession,
    open_handler: OpenSessionHandler<G, C>,
    submit_handler: SubmitTurnHandler<B, C>,
    toggle_handler: ToggleEvidenceHandler,
}

impl<B, G, C> ChatSessionController<B, G, C>
where
    B: ChatBackend,
    G: ChatbotRegistry,
    C: CredentialProvider,
{
    /// Creates a controller with a freshly opened session.
    ///
    /// Display metadata is not loaded until [`open`](Self::open) is called.
    pub fn new(chatbot_id: ChatbotId, backend: Arc<B>, registry: Arc<G>, credentials: Arc<C>) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::open(chatbot_id))),
            open_handler: OpenSessionHandler::new(registry, credentials.clone()),
            submit_handler: SubmitTurnHandler::new(backend, credentials),
            toggle_handler: ToggleEvidenceHandler::new(),
        }
    }

    /// (Re)initializes the session for `chatbot_id` and loads its metadata.
    pub async fn open(&self, chatbot_id: ChatbotId) -> OpenSessionResult {
        self.open_handler
            .handle(&self.session, OpenSessionCommand::new(chatbot_id))
            .await
    }

    /// Submits the given text as the next user turn.
    pub async fn submit(&self, text: impl Into<String>) -> Result<SubmitTurnOutcome, DomainError> {
        self.submit_handler
            .handle(&self.session, SubmitTurnCommand::new(text))
            .await
    }

    /// Routes a key press through the composer, submitting on plain Enter.
    ///
    /// The draft is cleared only when the submission was actually accepted,
    /// so text typed while a reply is pending is kept.
    pub async fn handle_key(
        &self,
        composer: &mut Composer,
        key: KeyPress,
    ) -> Result<KeyOutcome, DomainError> {
        match composer.handle_key(key) {
            ComposerAction::Edited => Ok(KeyOutcome::Edited),
            ComposerAction::Submit => {
                let draft = composer.draft().to_string();
                let outcome = self.submit(draft).await?;
                if outcome.was_dispatched() {
                    composer.clear();
                }
                Ok(KeyOutcome::Submitted(outcome))
            }
        }
    }

    /// Flips evidence visibility for a turn; returns the new state.
    pub async fn toggle_evidence(&self, turn_id: TurnId) -> Result<bool, DomainError> {
        self.toggle_handler
            .handle(&self.session, ToggleEvidenceCommand::new(turn_id))
            .await
    }

    /// Tears the session down; pending replies are dropped when they settle.
    pub async fn close(&self) {
        let mut session = self.session.lock().await;
        session.close();
        tracing::info!(session_id = %session.id(), "chat session closed");
    }

    /// Snapshot for rendering.
    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    /// Shared handle to the underlying session.
    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }
}
