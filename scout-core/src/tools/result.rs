//! Tool output and error model

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{FetchError, SearchError};

/// Output of a successful tool call
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    /// Tool that produced the output
    pub tool: String,

    /// Text handed back to the agent
    pub content: String,

    /// Call details for logging and replay
    pub metadata: Value,

    /// When the call completed
    pub completed_at: DateTime<Utc>,
}

impl ToolOutput {
    pub fn new(tool: impl Into<String>, content: impl Into<String>, metadata: Value) -> Self {
        Self {
            tool: tool.into(),
            content: content.into(),
            metadata,
            completed_at: Utc::now(),
        }
    }
}

/// Tool registration and execution failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Tool with this name already exists
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// Tool not found
    #[error("Tool '{0}' not found")]
    NotFound(String),

    /// Arguments did not match the tool's schema
    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    /// Scrape failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Search failed
    #[error(transparent)]
    Search(#[from] SearchError),
}
