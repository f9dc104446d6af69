//! Research tools: web search and objective-driven scraping

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::result::{ToolError, ToolOutput};
use super::tool::{Tool, ToolMetadata, ToolSchema, parse_args};
use crate::fetcher::ResearchFetcher;
use crate::search::SearchProvider;
use crate::splitter::char_len;

/// Arguments for `google_search`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    pub search_keyword: String,
}

/// Arguments for `web_scraping`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeArgs {
    /// The original objective and task the user gave the agent
    pub objective: String,
    /// Page to scrape
    pub url: String,
}

/// Web search returning the provider's raw response
pub struct GoogleSearchTool {
    metadata: ToolMetadata,
    provider: Arc<dyn SearchProvider>,
}

impl GoogleSearchTool {
    pub const NAME: &'static str = "google_search";

    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            metadata: ToolMetadata::new(Self::NAME, "Search the web for a keyword or question")
                .with_hint("Use to find relevant links and articles before scraping them")
                .with_returns("Raw search results as returned by the search provider")
                .with_tag("research"),
            provider,
        }
    }
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "search_keyword": {
                    "type": "string",
                    "description": "A search keyword or question"
                }
            },
            "required": ["search_keyword"],
            "additionalProperties": false
        }))
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let args: SearchArgs = parse_args(self.name(), args)?;
        let response = self.provider.search(&args.search_keyword).await?;

        Ok(ToolOutput::new(
            Self::NAME,
            response.body,
            json!({
                "provider": response.provider,
                "query": response.query,
            }),
        ))
    }
}

/// Scrape a page, summarizing it for the objective when it is large
pub struct WebScrapingTool {
    metadata: ToolMetadata,
    fetcher: Arc<ResearchFetcher>,
}

impl WebScrapingTool {
    pub const NAME: &'static str = "web_scraping";

    pub fn new(fetcher: Arc<ResearchFetcher>) -> Self {
        Self {
            metadata: ToolMetadata::new(
                Self::NAME,
                "Scrape a website and summarize its content for the objective if it is large",
            )
            .with_hint("Use on URLs of relevant links and articles to gather more information")
            .with_hint("Pass the user's original objective so summaries keep what matters")
            .with_returns("Page text, or a summary of it when the page is long")
            .with_tag("research"),
            fetcher,
        }
    }
}

#[async_trait]
impl Tool for WebScrapingTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "objective": {
                    "type": "string",
                    "description": "The objective and task the user gave the agent"
                },
                "url": {
                    "type": "string",
                    "description": "The URL of the website to scrape"
                }
            },
            "required": ["objective", "url"],
            "additionalProperties": false
        }))
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let args: ScrapeArgs = parse_args(self.name(), args)?;
        let content = self.fetcher.fetch(&args.objective, &args.url).await?;
        let chars = char_len(&content);

        Ok(ToolOutput::new(
            Self::NAME,
            content,
            json!({
                "url": args.url,
                "chars": chars,
            }),
        ))
    }
}
