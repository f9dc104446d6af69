//! Typed tools for agent frameworks
//!
//! Agent frameworks call research capabilities by name with JSON arguments.
//! Each [`Tool`] publishes its metadata and a JSON Schema for its
//! arguments, decodes them into a typed struct, and returns a [`ToolOutput`].
//! The [`ToolRegistry`] dispatches calls by name.
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run(config: ScoutConfig) -> scout_core::error::Result<()> {
//! let search = Arc::new(SerperProvider::from_config(&config.search)?);
//! let fetcher = Arc::new(ResearchFetcher::from_config(&config)?);
//! let registry = ToolRegistry::with_research_tools(search, fetcher);
//!
//! let output = registry
//!     .call("google_search", serde_json::json!({ "search_keyword": "ACL rehab" }))
//!     .await
//!     .map_err(|e| scout_core::error::ScoutError::Other(e.to_string()))?;
//! println!("{}", output.content);
//! # Ok(())
//! # }
//! ```

mod registry;
mod research;
mod result;
mod tool;

pub use registry::{ToolRegistry, ToolSummary};
pub use research::{GoogleSearchTool, ScrapeArgs, SearchArgs, WebScrapingTool};
pub use result::{ToolError, ToolOutput};
pub use tool::{Tool, ToolMetadata, ToolSchema, parse_args};
