//! # Scout - Objective-Driven Research Fetching
//!
//! Scout gives research agents two tools and the plumbing behind them:
//! - Web search through a Serper-compatible API
//! - Page scraping through a Browserless-compatible content service
//! - Map-reduce summarization of long pages against the caller's objective
//! - Text embeddings for downstream retrieval
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scout_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ScoutConfig::load()?;
//!     let fetcher = ResearchFetcher::from_config(&config)?;
//!
//!     // Short pages come back as-is, long pages as a summary
//!     let text = fetcher
//!         .fetch("find ACL surgery exercises", "https://example.com/rehab")
//!         .await?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Fetcher**: URL validation, extraction, threshold check, summarization
//! - **Splitter**: Recursive character splitting with overlap
//! - **Summarizer**: Map each chunk, then combine partial summaries
//! - **Tools**: `google_search` and `web_scraping` behind a name-keyed registry

pub mod config;
pub mod embeddings;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod llm;
pub mod search;
pub mod splitter;
pub mod summarize;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        EmbeddingsConfig, ExtractionConfig, LLMProviderConfig, ScoutConfig, SearchConfig,
        SummarizerConfig,
    };
    pub use crate::embeddings::{EmbeddingProvider, OpenAIEmbeddings};
    pub use crate::error::{FetchError, Result, ScoutError, SearchError};
    pub use crate::extract::{BrowserlessClient, ContentSource, visible_text};
    pub use crate::fetcher::{DEFAULT_SUMMARY_THRESHOLD, ResearchFetcher};
    pub use crate::llm::providers::OpenAIProvider;
    pub use crate::llm::{
        LLMConfig, LLMProvider, LLMProviderFactory, LLMRequest, LLMResponse, Message, MessageRole,
    };
    pub use crate::search::{SearchProvider, SearchResponse, SerperProvider};
    pub use crate::splitter::RecursiveCharacterSplitter;
    pub use crate::summarize::{MapReduceSummarizer, Summarizer, summary_prompt};
    pub use crate::tools::{
        GoogleSearchTool, Tool, ToolError, ToolMetadata, ToolOutput, ToolRegistry, ToolSchema,
        ToolSummary, WebScrapingTool,
    };
}
