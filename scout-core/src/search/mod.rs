//! Web search
//!
//! Search results are handed to the caller as the provider's raw response
//! body; this crate does not interpret them.

pub mod serper;

pub use serper::SerperProvider;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SearchError;

/// Raw response from a search provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// Provider that answered
    pub provider: String,
    /// Query as sent
    pub query: String,
    /// Response body, unparsed
    pub body: String,
}

/// Trait for web search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search for `query`.
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
