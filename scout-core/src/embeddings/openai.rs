//! OpenAI embeddings
//!
//! One request per call: no batching limits, no retry, no rate limiting.
//! Callers are responsible for input size and for handling failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::EmbeddingsConfig;
use crate::error::{Result, ScoutError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_DIMENSION: usize = 1536;

/// Embeddings from an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAIEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAIEmbeddings {
    /// Create a provider for `text-embedding-ada-002` (1536 dimensions).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Create from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ScoutError::Configuration(
                "Embeddings API key not configured (OPENAI_API_KEY)".to_string(),
            )
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ScoutError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dimension: config.dimension,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed `texts` with a single request.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Embedding`] if the request fails, the response
    /// cannot be parsed, the vector count does not match the input, or any
    /// vector has the wrong length.
    pub async fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| ScoutError::Embedding(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScoutError::Embedding(format!(
                "Embedding API error ({}): {}",
                status, text
            )));
        }

        let mut parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            ScoutError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(ScoutError::Embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);

        parsed
            .data
            .into_iter()
            .enumerate()
            .map(|(position, d)| {
                if d.index != position {
                    Err(ScoutError::Embedding(format!(
                        "Embedding indices do not cover the input: expected index {}, found {}",
                        position, d.index
                    )))
                } else if d.embedding.len() == self.dimension {
                    Ok(d.embedding)
                } else {
                    Err(ScoutError::Embedding(format!(
                        "Embedding {} has {} dimensions, expected {}",
                        d.index,
                        d.embedding.len(),
                        self.dimension
                    )))
                }
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.generate_embeddings(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vector(value: f32, len: usize) -> Vec<f32> {
        vec![value; len]
    }

    #[tokio::test]
    async fn test_embeddings_are_returned_in_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer key"))
            .and(body_json(serde_json::json!({
                "input": ["first", "second"],
                "model": "text-embedding-ada-002"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "index": 1, "embedding": vector(0.5, 1536) },
                    { "index": 0, "embedding": vector(0.25, 1536) }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        let vectors = provider.generate_embeddings(&["first", "second"]).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 1536);
        assert_eq!(vectors[0][0], 0.25);
        assert_eq!(vectors[1][0], 0.5);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "index": 0, "embedding": vector(1.0, 3) }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        let err = provider.embed("text").await.unwrap_err();
        assert!(matches!(err, ScoutError::Embedding(_)));
        assert!(err.to_string().contains("expected 1536"));
    }

    #[tokio::test]
    async fn test_duplicate_indices_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "index": 0, "embedding": vector(0.25, 1536) },
                    { "index": 0, "embedding": vector(0.5, 1536) }
                ]
            })))
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        let err = provider
            .generate_embeddings(&["first", "second"])
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Embedding(_)));
        assert!(err.to_string().contains("expected index 1, found 0"));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "index": 0, "embedding": vector(0.25, 1536) },
                    { "index": 5, "embedding": vector(0.5, 1536) }
                ]
            })))
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        let err = provider
            .generate_embeddings(&["first", "second"])
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_api_error_is_embedding_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("too many tokens"))
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        let err = provider.embed_batch(&["x"]).await.unwrap_err();
        assert!(err.to_string().contains("too many tokens"));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let provider = OpenAIEmbeddings::new("key").with_base_url(server.uri());
        assert!(provider.generate_embeddings(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = EmbeddingsConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let provider = OpenAIEmbeddings::from_config(&config).unwrap();
        assert_eq!(provider.model(), "text-embedding-ada-002");
        assert_eq!(provider.dimension(), 1536);
        assert!(OpenAIEmbeddings::from_config(&EmbeddingsConfig::default()).is_err());
    }
}
