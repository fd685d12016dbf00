//! HTTP Chat Backend - `ChatBackend` over the service's REST chat endpoint.
//!
//! # Endpoint
//!
//! `POST {base_url}/chat/{chatbot_id}/` with body
//! `{"message": "...", "conversation_id": <id or null>}`. The bearer
//! credential, when present, goes in the `Authorization` header.
//!
//! Each call is a single attempt. A failed turn is reported to the user as
//! an apology and they decide whether to ask again.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use super::wire::{ChatReplyBody, ChatRequestBody};
use crate::adapters::connection::{truncate_body, ConnectionConfig};
use crate::domain::chat::AssistantReply;
use crate::ports::{ChatBackend, ChatBackendError, ChatRequest};

/// Chat backend speaking the service's JSON API.
pub struct HttpChatBackend {
    config: ConnectionConfig,
    client: Client,
}

impl HttpChatBackend {
    /// Creates a backend for the given connection settings.
    pub fn new(config: ConnectionConfig) -> Result<Self, ChatBackendError> {
        let client = config
            .build_client()
            .map_err(|e| ChatBackendError::Configuration(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn chat_url(&self, request: &ChatRequest) -> String {
        self.config.endpoint(&["chat", request.chatbot_id.as_str()])
    }

    async fn post(&self, request: &ChatRequest) -> Result<Response, ChatBackendError> {
        let body = ChatRequestBody {
            message: &request.message,
            conversation_id: request.conversation_id.as_ref(),
        };

        let mut builder = self.client.post(self.chat_url(request)).json(&body);
        if let Some(credential) = &request.credential {
            builder = builder.header(reqwest::header::AUTHORIZATION, credential.header_value());
        }

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatBackendError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                ChatBackendError::network(format!("Connection failed: {}", e))
            } else {
                ChatBackendError::network(e.to_string())
            }
        })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ChatBackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ChatBackendError::Unauthorized),
            _ => Err(ChatBackendError::status(
                status.as_u16(),
                truncate_body(&error_body),
            )),
        }
    }

    async fn parse_response(&self, response: Response) -> Result<AssistantReply, ChatBackendError> {
        let response = self.handle_response_status(response).await?;

        let body: ChatReplyBody = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ChatBackendError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else {
                ChatBackendError::malformed(format!("Failed to parse reply: {}", e))
            }
        })?;

        body.into_reply()
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: ChatRequest) -> Result<AssistantReply, ChatBackendError> {
        tracing::debug!(
            chatbot_id = %request.chatbot_id,
            has_conversation = request.conversation_id.is_some(),
            authenticated = request.credential.is_some(),
            "posting chat message"
        );

        let response = self.post(&request).await?;
        let reply = self.parse_response(response).await;

        if let Err(err) = &reply {
            tracing::debug!(error = %err, kind = err.kind(), "chat request failed");
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChatbotId, ConversationId};
    use crate::ports::Credential;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> HttpChatBackend {
        let config = ConnectionConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_secs(2));
        HttpChatBackend::new(config).unwrap()
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest::new(ChatbotId::new("3").unwrap(), message)
    }

    #[tokio::test]
    async fn posts_message_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/3/"))
            .and(body_json(json!({"message": "What is the refund window?", "conversation_id": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversation_id": 42,
                "ai_response": {"id": 9, "content": "Refunds are accepted within 30 days.", "tokens_used": 120},
                "context": [
                    {"document": "policy.pdf", "similarity": 0.912, "content_preview": "Refunds are accepted..."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend_for(&server)
            .send(request("What is the refund window?"))
            .await
            .unwrap();

        assert_eq!(reply.content, "Refunds are accepted within 30 days.");
        assert_eq!(reply.conversation_id, Some(ConversationId::number(42)));
        assert_eq!(reply.tokens_used, Some(120));
        assert_eq!(reply.evidence.len(), 1);
    }

    #[tokio::test]
    async fn sends_conversation_id_and_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/3/"))
            .and(header("authorization", "Bearer tok-1"))
            .and(body_json(json!({"message": "And digital goods?", "conversation_id": 42})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversation_id": 42,
                "ai_response": {"content": "Not refundable."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let req = request("And digital goods?")
            .with_conversation_id(ConversationId::number(42))
            .with_credential(Credential::bearer("tok-1").unwrap());

        let reply = backend_for(&server).send(req).await.unwrap();
        assert_eq!(reply.content, "Not refundable.");
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("no token"))
            .mount(&server)
            .await;

        let err = backend_for(&server).send(request("hi")).await.unwrap_err();
        assert!(matches!(err, ChatBackendError::Unauthorized));
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("no documents indexed"))
            .mount(&server)
            .await;

        let err = backend_for(&server).send(request("hi")).await.unwrap_err();
        match err {
            ChatBackendError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "no documents indexed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_malformed_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let err = backend_for(&server).send(request("hi")).await.unwrap_err();
        assert!(matches!(err, ChatBackendError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ai_response": {"content": "late"}}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ConnectionConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_millis(200));
        let backend = HttpChatBackend::new(config).unwrap();

        let err = backend.send(request("hi")).await.unwrap_err();
        assert!(matches!(err, ChatBackendError::Timeout { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_network() {
        let config = ConnectionConfig::new("http://127.0.0.1:9/api")
            .with_timeout(Duration::from_secs(2));
        let backend = HttpChatBackend::new(config).unwrap();

        let err = backend.send(request("hi")).await.unwrap_err();
        assert!(matches!(
            err,
            ChatBackendError::Network(_) | ChatBackendError::Timeout { .. }
        ));
    }
}
