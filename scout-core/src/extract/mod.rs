//! Content extraction
//!
//! A [`ContentSource`] turns a URL into rendered page markup. The default
//! implementation calls a Browserless-style headless-browser service;
//! [`visible_text`] then reduces that markup to what a reader would see.

pub mod html;

pub use html::visible_text;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::config::ExtractionConfig;
use crate::error::{FetchError, Result, ScoutError};

/// Source of rendered page markup.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the rendered markup for `url`.
    ///
    /// Non-success responses are reported as [`FetchError::UpstreamFailure`]
    /// and are never retried.
    async fn content(&self, url: &Url) -> std::result::Result<String, FetchError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Request body for the `/content` endpoint
#[derive(Debug, Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
}

/// Client for a headless-browser content service (`POST /content`).
pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BrowserlessClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no API token is configured or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ScoutError::Configuration(
                "Content extraction token not configured (BROWSERLESS_API_KEY)".to_string(),
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
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContentSource for BrowserlessClient {
    async fn content(&self, url: &Url) -> std::result::Result<String, FetchError> {
        let endpoint = format!("{}/content", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("token", self.api_key.as_str())])
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .json(&ContentRequest {
                url: url.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::ExtractionFailure(format!("Request for {} timed out", url))
                } else {
                    FetchError::ExtractionFailure(format!(
                        "Failed to reach content service for {}: {}",
                        url, e
                    ))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Content service request failed");
            return Err(FetchError::UpstreamFailure(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            FetchError::ExtractionFailure(format!("Failed to read content for {}: {}", url, e))
        })
    }

    fn name(&self) -> &'static str {
        "browserless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target() -> Url {
        Url::parse("https://example.com/article").unwrap()
    }

    #[tokio::test]
    async fn test_posts_url_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content"))
            .and(query_param("token", "secret"))
            .and(header("cache-control", "no-cache"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "url": "https://example.com/article" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = BrowserlessClient::new(server.uri(), "secret");
        let markup = client.content(&target()).await.unwrap();
        assert_eq!(markup, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = BrowserlessClient::new(server.uri(), "secret");
        let err = client.content(&target()).await.unwrap_err();
        assert_eq!(err, FetchError::UpstreamFailure(503));
    }

    #[tokio::test]
    async fn test_timeout_is_extraction_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ExtractionConfig {
            base_url: server.uri(),
            api_key: Some("secret".to_string()),
            timeout: Some(Duration::from_millis(50)),
        };
        let client = BrowserlessClient::from_config(&config).unwrap();
        let err = client.content(&target()).await.unwrap_err();
        assert!(matches!(err, FetchError::ExtractionFailure(_)));
    }

    #[test]
    fn test_from_config_requires_token() {
        let result = BrowserlessClient::from_config(&ExtractionConfig::default());
        assert!(matches!(result, Err(ScoutError::Configuration(_))));
    }
}
