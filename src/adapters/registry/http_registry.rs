//! HTTP Chatbot Registry - `GET {base_url}/chatbots/{id}/`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::adapters::connection::{truncate_body, ConnectionConfig};
use crate::domain::chat::ChatbotSummary;
use crate::domain::foundation::ChatbotId;
use crate::ports::{ChatbotRegistry, Credential, RegistryError};

#[derive(Debug, Deserialize)]
struct ChatbotBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// Registry backed by the service's chatbot detail endpoint.
pub struct HttpChatbotRegistry {
    config: ConnectionConfig,
    client: Client,
}

impl HttpChatbotRegistry {
    pub fn new(config: ConnectionConfig) -> Result<Self, RegistryError> {
        let client = config
            .build_client()
            .map_err(|e| RegistryError::unavailable(format!("client setup failed: {}", e)))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatbotRegistry for HttpChatbotRegistry {
    async fn fetch(
        &self,
        id: &ChatbotId,
        credential: Option<&Credential>,
    ) -> Result<ChatbotSummary, RegistryError> {
        let url = self.config.endpoint(&["chatbots", id.as_str()]);
        tracing::debug!("Fetching chatbot metadata from {}", url);

        let mut builder = self.client.get(&url);
        if let Some(credential) = credential {
            builder = builder.header(reqwest::header::AUTHORIZATION, credential.header_value());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RegistryError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => RegistryError::NotFound(id.clone()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RegistryError::Unauthorized,
                _ => RegistryError::unavailable(format!("{}: {}", status, truncate_body(&body))),
            });
        }

        let body: ChatbotBody = response
            .json()
            .await
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;

        let mut summary = ChatbotSummary::new(id.clone(), body.name);
        if let Some(description) = body.description.filter(|d| !d.trim().is_empty()) {
            summary = summary.with_description(description);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registry_for(server: &MockServer) -> HttpChatbotRegistry {
        let config = ConnectionConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_secs(2));
        HttpChatbotRegistry::new(config).unwrap()
    }

    fn id() -> ChatbotId {
        ChatbotId::new("3").unwrap()
    }

    #[tokio::test]
    async fn fetches_name_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chatbots/3/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "name": "Support Bot",
                "description": "Answers questions about our policies",
                "created_at": "2024-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = Credential::bearer("tok").unwrap();
        let summary = registry_for(&server)
            .fetch(&id(), Some(&credential))
            .await
            .unwrap();

        assert_eq!(summary.id, id());
        assert_eq!(summary.name, "Support Bot");
        assert_eq!(
            summary.description.as_deref(),
            Some("Answers questions about our policies")
        );
    }

    #[tokio::test]
    async fn blank_description_is_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "3", "name": "Bot", "description": ""})),
            )
            .mount(&server)
            .await;

        let summary = registry_for(&server).fetch(&id(), None).await.unwrap();
        assert!(summary.description.is_none());
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = registry_for(&server).fetch(&id(), None).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn forbidden_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = registry_for(&server).fetch(&id(), None).await.unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized));
    }

    #[tokio::test]
    async fn missing_name_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
            .mount(&server)
            .await;

        let err = registry_for(&server).fetch(&id(), None).await.unwrap_err();
        assert!(matches!(err, RegistryError::Malformed(_)));
    }
}
