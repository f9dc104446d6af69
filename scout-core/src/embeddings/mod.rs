//! Embedding providers for turning text into vectors.

pub mod openai;

pub use openai::OpenAIEmbeddings;

use async_trait::async_trait;

use crate::error::{Result, ScoutError};

/// Trait for embedding provider implementations.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts in one call.
    ///
    /// # Returns
    ///
    /// Vector of embeddings, one per input text, in input order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| ScoutError::Embedding("Provider returned no embedding".to_string()))
    }

    /// Get the dimension of embeddings produced by this provider.
    fn dimension(&self) -> usize;
}
