//! Tool trait and metadata definitions

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::result::{ToolError, ToolOutput};

/// Tool metadata for LLM-friendly discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool name (unique identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// When should the LLM use this tool?
    pub usage_hints: Vec<String>,

    /// What the tool returns
    pub returns: String,

    /// Tags for categorization
    pub tags: Vec<String>,
}

impl ToolMetadata {
    /// Create new metadata with required fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage_hints: Vec::new(),
            returns: "Tool-specific result".to_string(),
            tags: Vec::new(),
        }
    }

    /// Add a usage hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.usage_hints.push(hint.into());
        self
    }

    /// Set return description
    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = returns.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// JSON Schema for input parameters
    pub parameters: Value,
}

impl ToolSchema {
    /// Create a schema from a JSON Schema value
    pub fn new(parameters: Value) -> Self {
        Self { parameters }
    }

    /// Names listed under `required`
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Core tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata
    fn metadata(&self) -> &ToolMetadata;

    /// Get tool name (convenience method)
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Get tool description (convenience method)
    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Get the JSON schema for this tool's parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with JSON arguments
    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError>;
}

/// Decode JSON arguments for `tool` into a typed struct.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}
