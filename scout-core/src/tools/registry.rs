//! Tool registry for registration, lookup, and dispatch by name

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::research::{GoogleSearchTool, WebScrapingTool};
use super::result::{ToolError, ToolOutput};
use super::tool::{Tool, ToolSchema};
use crate::fetcher::ResearchFetcher;
use crate::search::SearchProvider;

/// Summary of a tool for listing
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Usage hints
    pub usage_hints: Vec<String>,
    /// What the tool returns
    pub returns: String,
    /// Tags for categorization
    pub tags: Vec<String>,
    /// Argument schema
    pub schema: ToolSchema,
}

impl From<&dyn Tool> for ToolSummary {
    fn from(tool: &dyn Tool) -> Self {
        let metadata = tool.metadata();
        Self {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            usage_hints: metadata.usage_hints.clone(),
            returns: metadata.returns.clone(),
            tags: metadata.tags.clone(),
            schema: tool.schema(),
        }
    }
}

/// Registry of tools keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `google_search` and `web_scraping`
    pub fn with_research_tools(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<ResearchFetcher>,
    ) -> Self {
        let mut registry = Self::new();
        registry
            .tools
            .insert(GoogleSearchTool::NAME.to_string(), Arc::new(GoogleSearchTool::new(search)));
        registry
            .tools
            .insert(WebScrapingTool::NAME.to_string(), Arc::new(WebScrapingTool::new(fetcher)));
        registry
    }

    /// Register a tool
    ///
    /// Returns an error if a tool with the same name is already registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Get all tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tools with their summaries, sorted by name
    pub fn list(&self) -> Vec<ToolSummary> {
        self.tools
            .values()
            .map(|t| ToolSummary::from(t.as_ref()))
            .collect()
    }

    /// Call the tool registered as `name`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tracing::debug!(tool = name, "Dispatching tool call");
        let result = tool.execute(args).await;
        if let Err(error) = &result {
            tracing::warn!(tool = name, %error, "Tool call failed");
        }
        result
    }
}
