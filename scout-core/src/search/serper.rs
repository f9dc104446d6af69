//! Serper (Google search) provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{SearchProvider, SearchResponse};
use crate::config::SearchConfig;
use crate::error::{Result, ScoutError, SearchError};

/// Serper search provider: `POST {"q": ...}` with an `X-API-KEY` header.
pub struct SerperProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
}

impl SerperProvider {
    /// Create a provider for `endpoint`.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Create from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. A missing API key
    /// is reported when searching.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ScoutError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    async fn search(&self, query: &str) -> std::result::Result<SearchResponse, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery);
        }
        if self.api_key.is_empty() {
            return Err(SearchError::MissingApiKey {
                provider: self.name().to_string(),
            });
        }

        tracing::info!(query, provider = self.name(), "Searching");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest { q: query })
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(query, status = status.as_u16(), "Search request failed");
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(query, bytes = body.len(), "Search response received");

        Ok(SearchResponse {
            provider: self.name().to_string(),
            query: query.to_string(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "serper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_returns_raw_body() {
        let server = MockServer::start().await;
        let body = r#"{"organic":[{"title":"ACL protocol","link":"https://example.com/acl"}]}"#;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("x-api-key", "serper-key"))
            .and(body_json(serde_json::json!({ "q": "acl rehab week 1" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = SerperProvider::new(format!("{}/search", server.uri()), "serper-key");
        let response = provider.search("  acl rehab week 1 ").await.unwrap();

        assert_eq!(response.body, body);
        assert_eq!(response.query, "acl rehab week 1");
        assert_eq!(response.provider, "serper");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized."))
            .mount(&server)
            .await;

        let provider = SerperProvider::new(server.uri(), "bad-key");
        let err = provider.search("anything").await.unwrap_err();
        assert_eq!(
            err,
            SearchError::ApiError {
                status: 403,
                message: "Unauthorized.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_query_and_missing_key() {
        let provider = SerperProvider::new("https://google.serper.dev/search", "key");
        assert_eq!(provider.search("   ").await.unwrap_err(), SearchError::InvalidQuery);

        let provider = SerperProvider::from_config(&SearchConfig::default()).unwrap();
        assert!(matches!(
            provider.search("query").await.unwrap_err(),
            SearchError::MissingApiKey { .. }
        ));
    }
}
