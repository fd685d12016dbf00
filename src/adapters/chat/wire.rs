//! JSON shapes exchanged with the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::chat::{AssistantReply, Evidence, Similarity};
use crate::domain::foundation::{ConversationId, OpaqueToken};
use crate::ports::ChatBackendError;

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequestBody<'a> {
    pub message: &'a str,
    pub conversation_id: Option<&'a ConversationId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReplyBody {
    #[serde(default)]
    pub conversation_id: Option<OpaqueToken>,
    pub ai_response: AiResponseBody,
    #[serde(default)]
    pub context: Option<Vec<ContextItemBody>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AiResponseBody {
    #[serde(default)]
    pub id: Option<OpaqueToken>,
    pub content: String,
    #[serde(default)]
    pub tokens_used: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContextItemBody {
    pub document: String,
    pub similarity: f64,
    #[serde(default)]
    pub content_preview: String,
}

impl ChatReplyBody {
    /// Converts the wire reply into the domain's reply shape.
    pub fn into_reply(self) -> Result<AssistantReply, ChatBackendError> {
        let mut reply = AssistantReply::new(self.ai_response.content);

        if let Some(token) = self.conversation_id {
            reply = reply.with_conversation_id(ConversationId::from_token(token));
        }
        if let Some(id) = self.ai_response.id {
            reply = reply.with_remote_id(id.to_string());
        }
        if let Some(tokens) = self.ai_response.tokens_used {
            reply = reply.with_tokens_used(tokens);
        }

        for item in self.context.unwrap_or_default() {
            let similarity = Similarity::clamped(item.similarity).map_err(|e| {
                ChatBackendError::malformed(format!("context '{}': {}", item.document, e))
            })?;
            reply = reply.with_evidence(Evidence::new(
                item.document,
                similarity,
                item.content_preview,
            ));
        }

        Ok(reply)
    }
}
