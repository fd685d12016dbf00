//! OpenSession command handler.
//!
//! (Re)initializes the shared session for a chatbot and loads its display
//! metadata. Metadata is best effort: a failed lookup is logged and the
//! session stays usable under a generic title.

use std::sync::Arc;

use crate::domain::chat::{ChatbotSummary, SessionEpoch};
use crate::domain::foundation::{ChatbotId, SessionId};
use crate::ports::{ChatbotRegistry, CredentialProvider};

use super::{read_credential, SharedSession};

/// Command to open (or switch) the session to a chatbot.
#[derive(Debug, Clone)]
pub struct OpenSessionCommand {
    pub chatbot_id: ChatbotId,
}

impl OpenSessionCommand {
    pub fn new(chatbot_id: ChatbotId) -> Self {
        Self { chatbot_id }
    }
}

/// Result of opening a session.
#[derive(Debug, Clone)]
pub struct OpenSessionResult {
    pub session_id: SessionId,
    pub epoch: SessionEpoch,
    /// Display metadata, if the lookup succeeded and the session was not
    /// re-initialized again in the meantime.
    pub chatbot: Option<ChatbotSummary>,
}

/// Handler for opening sessions.
pub struct OpenSessionHandler<G, C>
where
    G: ChatbotRegistry,
    C: CredentialProvider,
{
    registry: Arc<G>,
    credentials: Arc<C>,
}

impl<G, C> OpenSessionHandler<G, C>
where
    G: ChatbotRegistry,
    C: CredentialProvider,
{
    pub fn new(registry: Arc<G>, credentials: Arc<C>) -> Self {
        Self {
            registry,
            credentials,
        }
    }

    pub async fn handle(&self, session: &SharedSession, cmd: OpenSessionCommand) -> OpenSessionResult {
        let (session_id, epoch) = {
            let mut session = session.lock().await;
            session.initialize(cmd.chatbot_id.clone());
            (session.id(), session.epoch())
        };

        tracing::info!(
            session_id = %session_id,
            chatbot_id = %cmd.chatbot_id,
            "chat session initialized"
        );

        let credential = read_credential(self.credentials.as_ref()).await;
        let lookup = self
            .registry
            .fetch(&cmd.chatbot_id, credential.as_ref())
            .await;

        let chatbot = match lookup {
            Ok(summary) => {
                let mut session = session.lock().await;
                if session.apply_chatbot(epoch, summary.clone()) {
                    Some(summary)
                } else {
                    tracing::debug!(
                        chatbot_id = %cmd.chatbot_id,
                        "discarding metadata for a superseded session"
                    );
                    None
                }
            }
            Err(err) => {
                tracing::warn!(
                    chatbot_id = %cmd.chatbot_id,
                    error = %err,
                    "chatbot metadata lookup failed"
                );
                None
            }
        };

        OpenSessionResult {
            session_id,
            epoch,
            chatbot,
        }
    }
}
