//! Research fetcher
//!
//! Fetches a page through the content-extraction service, reduces it to
//! visible text, and hands it back. Pages longer than the threshold are
//! split into chunks and summarized against the caller's objective instead.
//! Nothing is cached between calls and nothing is retried.

use std::sync::Arc;

use url::Url;

use crate::config::ScoutConfig;
use crate::error::{FetchError, Result};
use crate::extract::{BrowserlessClient, ContentSource, visible_text};
use crate::llm::LLMProviderFactory;
use crate::splitter::{RecursiveCharacterSplitter, char_len};
use crate::summarize::{MapReduceSummarizer, Summarizer};

/// Pages with more characters than this are summarized
pub const DEFAULT_SUMMARY_THRESHOLD: usize = 10_000;

/// Objective-driven page fetcher.
pub struct ResearchFetcher {
    source: Arc<dyn ContentSource>,
    summarizer: Arc<dyn Summarizer>,
    splitter: RecursiveCharacterSplitter,
    threshold_chars: usize,
}

impl std::fmt::Debug for ResearchFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchFetcher")
            .field("source", &self.source.name())
            .field("splitter", &self.splitter)
            .field("threshold_chars", &self.threshold_chars)
            .finish()
    }
}

impl ResearchFetcher {
    /// Create a fetcher from its collaborators.
    pub fn new(
        source: Arc<dyn ContentSource>,
        summarizer: Arc<dyn Summarizer>,
        splitter: RecursiveCharacterSplitter,
    ) -> Self {
        Self {
            source,
            summarizer,
            splitter,
            threshold_chars: DEFAULT_SUMMARY_THRESHOLD,
        }
    }

    /// Build the Browserless + OpenAI fetcher described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an API key is missing or the
    /// splitter settings are invalid.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let source = Arc::new(BrowserlessClient::from_config(&config.extraction)?);
        let provider = LLMProviderFactory::create(&config.llm)?;
        let summarizer = Arc::new(MapReduceSummarizer::from_config(
            provider,
            &config.summarizer,
            &config.llm,
        ));
        let splitter = RecursiveCharacterSplitter::from_config(&config.summarizer)?;

        Ok(Self::new(source, summarizer, splitter).with_threshold(config.summarizer.threshold_chars))
    }

    /// Set the summarization threshold in characters.
    pub fn with_threshold(mut self, threshold_chars: usize) -> Self {
        self.threshold_chars = threshold_chars;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold_chars
    }

    /// Fetch `url` and return its visible text, or a summary of it for
    /// `objective` when the text is longer than the threshold.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if `url` is not an http(s) URL
    /// - [`FetchError::UpstreamFailure`] if the extraction service answers
    ///   with a non-success status; no summarization is attempted
    /// - [`FetchError::ExtractionFailure`] on transport failures or timeouts
    /// - [`FetchError::SummarizationFailure`] if the summarizer fails
    pub async fn fetch(&self, objective: &str, url: &str) -> std::result::Result<String, FetchError> {
        let url = parse_http_url(url)?;

        tracing::info!(%url, source = self.source.name(), "Scraping website");
        let markup = self.source.content(&url).await?;

        let content = visible_text(&markup);
        let length = char_len(&content);
        tracing::debug!(%url, chars = length, "Extracted page content");

        if length <= self.threshold_chars {
            tracing::info!(%url, chars = length, "Returning page content unchanged");
            return Ok(content);
        }

        let chunks = self.splitter.split(&content);
        tracing::info!(
            %url,
            chars = length,
            chunks = chunks.len(),
            "Page content exceeds threshold, summarizing"
        );

        let summary = self.summarizer.summarize(objective, &chunks).await?;
        tracing::debug!(%url, chars = char_len(&summary), "Summary produced");
        Ok(summary)
    }
}

/// Parse `raw` and require an http(s) scheme with a host.
pub fn parse_http_url(raw: &str) -> std::result::Result<Url, FetchError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        "http" | "https" => Err(FetchError::InvalidUrl(format!("{}: missing host", raw))),
        scheme => Err(FetchError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw, scheme
        ))),
    }
}
