//! Map-reduce summarization
//!
//! Each chunk is summarized on its own against the caller's objective (map),
//! then the partial summaries are summarized together with the same prompt
//! (reduce). When the partial summaries are too long to combine in one call
//! they are first collapsed in batches.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};

use crate::config::{LLMProviderConfig, SummarizerConfig};
use crate::error::FetchError;
use crate::llm::{LLMConfig, LLMProvider, LLMRequest};
use crate::splitter::char_len;

/// Separator placed between partial summaries when they are combined
const SUMMARY_SEPARATOR: &str = "\n\n";

/// Collapse passes attempted before combining whatever is left
const MAX_COLLAPSE_ROUNDS: usize = 3;

/// Render the summary prompt used for map, collapse and reduce calls.
pub fn summary_prompt(objective: &str, text: &str) -> String {
    format!(
        "Write a summary of the following text for {}:\n\"{}\"\nSUMMARY:",
        objective, text
    )
}

/// Reduces a list of chunks to one summary guided by an objective.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `chunks` for `objective`.
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`FetchError::SummarizationFailure`].
    async fn summarize(&self, objective: &str, chunks: &[String]) -> Result<String, FetchError>;
}

/// [`Summarizer`] backed by an [`LLMProvider`].
pub struct MapReduceSummarizer {
    provider: Arc<dyn LLMProvider>,
    llm_config: LLMConfig,
    collapse_max_chars: usize,
    map_concurrency: usize,
}

impl std::fmt::Debug for MapReduceSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapReduceSummarizer")
            .field("model", &self.provider.model_info().model_name)
            .field("llm_config", &self.llm_config)
            .field("collapse_max_chars", &self.collapse_max_chars)
            .field("map_concurrency", &self.map_concurrency)
            .finish()
    }
}

impl MapReduceSummarizer {
    /// Create a summarizer with default settings (temperature 0, sequential map).
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        let defaults = SummarizerConfig::default();
        Self {
            provider,
            llm_config: LLMConfig::default(),
            collapse_max_chars: defaults.collapse_max_chars,
            map_concurrency: defaults.map_concurrency,
        }
    }

    /// Create a summarizer from the loaded configuration.
    pub fn from_config(
        provider: Arc<dyn LLMProvider>,
        summarizer: &SummarizerConfig,
        llm: &LLMProviderConfig,
    ) -> Self {
        Self::new(provider)
            .with_llm_config(
                LLMConfig::new()
                    .with_temperature(llm.temperature)
                    .with_max_tokens(llm.max_tokens),
            )
            .with_collapse_max_chars(summarizer.collapse_max_chars)
            .with_map_concurrency(summarizer.map_concurrency)
    }

    pub fn with_llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = config;
        self
    }

    pub fn with_collapse_max_chars(mut self, max_chars: usize) -> Self {
        self.collapse_max_chars = max_chars.max(1);
        self
    }

    pub fn with_map_concurrency(mut self, concurrency: usize) -> Self {
        self.map_concurrency = concurrency.max(1);
        self
    }

    async fn summarize_text(&self, objective: &str, text: &str) -> Result<String, FetchError> {
        let request = LLMRequest::from_config(summary_prompt(objective, text), &self.llm_config);
        let response = self
            .provider
            .generate_request(&request)
            .await
            .map_err(|e| FetchError::SummarizationFailure(e.to_string()))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Summary call completed"
            );
        }
        Ok(response.content.trim().to_string())
    }

    /// Summarize each text independently, preserving input order.
    async fn summarize_each<S: AsRef<str> + Sync>(
        &self,
        objective: &str,
        texts: &[S],
    ) -> Result<Vec<String>, FetchError> {
        let calls: Vec<_> = texts
            .iter()
            .map(|t| self.summarize_text(objective, t.as_ref()))
            .collect();
        stream::iter(calls)
            .buffered(self.map_concurrency)
            .try_collect()
            .await
    }

    async fn reduce(&self, objective: &str, mut summaries: Vec<String>) -> Result<String, FetchError> {
        let mut round = 0;
        while summaries.len() > 1 && joined_len(&summaries) > self.collapse_max_chars {
            if round == MAX_COLLAPSE_ROUNDS {
                tracing::warn!(
                    summaries = summaries.len(),
                    chars = joined_len(&summaries),
                    "Partial summaries still exceed the collapse limit; combining anyway"
                );
                break;
            }

            let batches: Vec<String> = batch_by_size(&summaries, self.collapse_max_chars)
                .into_iter()
                .map(|batch| batch.join(SUMMARY_SEPARATOR))
                .collect();

            tracing::debug!(
                round,
                from = summaries.len(),
                to = batches.len(),
                "Collapsing partial summaries"
            );

            summaries = self.summarize_each(objective, &batches).await?;
            round += 1;
        }

        self.summarize_text(objective, &summaries.join(SUMMARY_SEPARATOR))
            .await
    }
}

#[async_trait]
impl Summarizer for MapReduceSummarizer {
    async fn summarize(&self, objective: &str, chunks: &[String]) -> Result<String, FetchError> {
        if chunks.is_empty() {
            return Err(FetchError::SummarizationFailure(
                "Nothing to summarize".to_string(),
            ));
        }

        tracing::debug!(chunks = chunks.len(), "Mapping chunks to partial summaries");
        let partials = self.summarize_each(objective, chunks).await?;

        tracing::debug!(partials = partials.len(), "Reducing partial summaries");
        self.reduce(objective, partials).await
    }
}

fn joined_len(parts: &[String]) -> usize {
    let separators = parts.len().saturating_sub(1) * SUMMARY_SEPARATOR.len();
    parts.iter().map(|p| char_len(p)).sum::<usize>() + separators
}

/// Group consecutive parts so each group's joined length stays within
/// `max_chars`. A part longer than the limit forms its own group.
fn batch_by_size(parts: &[String], max_chars: usize) -> Vec<Vec<&str>> {
    let mut batches = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for part in parts {
        let len = char_len(part);
        let added = if current.is_empty() {
            len
        } else {
            len + SUMMARY_SEPARATOR.len()
        };

        if !current.is_empty() && current_len + added > max_chars {
            batches.push(std::mem::take(&mut current));
            current_len = 0;
            current.push(part.as_str());
            current_len += len;
        } else {
            current.push(part.as_str());
            current_len += added;
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScoutError};
    use crate::llm::{LLMResponse, TokenUsage};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns `partial-N` for the N-th call and records every prompt.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LLMProvider for CountingProvider {
        async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push(request.prompt().unwrap_or_default().to_string());
            Ok(LLMResponse {
                content: format!(" partial-{} \n", n),
                usage: None,
            })
        }
    }

    /// Wraps the quoted text of the prompt in angle brackets.
    struct BracketProvider;

    #[async_trait]
    impl LLMProvider for BracketProvider {
        async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
            let prompt = request.prompt().unwrap_or_default();
            let start = prompt.find('"').unwrap() + 1;
            let end = prompt.rfind('"').unwrap();
            Ok(LLMResponse {
                content: format!("<{}>", &prompt[start..end]),
                usage: None,
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn generate_request(&self, _request: &LLMRequest) -> Result<LLMResponse> {
            Err(ScoutError::Llm("service unavailable".to_string()))
        }
    }

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_prompt_format() {
        let prompt = summary_prompt("find ACL surgery exercises", "quad sets");
        assert_eq!(
            prompt,
            "Write a summary of the following text for find ACL surgery exercises:\n\"quad sets\"\nSUMMARY:"
        );
    }

    #[tokio::test]
    async fn test_map_then_reduce() {
        let provider = Arc::new(CountingProvider::default());
        let summarizer = MapReduceSummarizer::new(provider.clone());

        let summary = summarizer
            .summarize("rehab plan", &chunks(&["first chunk", "second chunk"]))
            .await
            .unwrap();

        assert_eq!(summary, "partial-2");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts.iter().all(|p| p.contains("rehab plan")));
        assert!(prompts[0].contains("first chunk"));
        assert!(prompts[1].contains("second chunk"));
        assert!(prompts[2].contains("\"partial-0\n\npartial-1\""));
    }

    #[tokio::test]
    async fn test_single_chunk_still_reduces() {
        let provider = Arc::new(CountingProvider::default());
        let summarizer = MapReduceSummarizer::new(provider.clone());

        let summary = summarizer
            .summarize("objective", &chunks(&["only chunk"]))
            .await
            .unwrap();
        assert_eq!(summary, "partial-1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_collapses_when_partials_are_too_long() {
        let provider = Arc::new(CountingProvider::default());
        let summarizer = MapReduceSummarizer::new(provider.clone()).with_collapse_max_chars(25);

        let summary = summarizer
            .summarize("objective", &chunks(&["a", "b", "c", "d"]))
            .await
            .unwrap();

        // 4 map calls, 2 collapse calls, 1 final combine
        assert_eq!(provider.calls.load(Ordering::SeqCst), 7);
        assert_eq!(summary, "partial-6");

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[4].contains("partial-0\n\npartial-1"));
        assert!(prompts[5].contains("partial-2\n\npartial-3"));
        assert!(prompts[6].contains("partial-4\n\npartial-5"));
    }

    #[tokio::test]
    async fn test_concurrent_map_preserves_order() {
        let summarizer =
            MapReduceSummarizer::new(Arc::new(BracketProvider)).with_map_concurrency(3);

        let summary = summarizer
            .summarize("objective", &chunks(&["a", "b", "c"]))
            .await
            .unwrap();
        assert_eq!(summary, "<<a>\n\n<b>\n\n<c>>");
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let provider = Arc::new(CountingProvider::default());
        let summarizer = MapReduceSummarizer::new(provider.clone());

        let err = summarizer.summarize("objective", &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::SummarizationFailure(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_error_becomes_summarization_failure() {
        let summarizer = MapReduceSummarizer::new(Arc::new(FailingProvider));
        let err = summarizer
            .summarize("objective", &chunks(&["text"]))
            .await
            .unwrap_err();

        match err {
            FetchError::SummarizationFailure(message) => {
                assert!(message.contains("service unavailable"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Records the call settings of every request.
    #[derive(Default)]
    struct SettingsProvider {
        seen: Mutex<Vec<(Option<f32>, Option<usize>)>>,
    }

    #[async_trait]
    impl LLMProvider for SettingsProvider {
        async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((request.temperature, request.max_tokens));
            Ok(LLMResponse {
                content: "done".to_string(),
                usage: Some(TokenUsage {
                    prompt_tokens: 40,
                    completion_tokens: 2,
                    total_tokens: 42,
                }),
            })
        }
    }

    #[tokio::test]
    async fn test_from_config_applies_llm_settings() {
        let provider = Arc::new(SettingsProvider::default());
        let llm = LLMProviderConfig {
            temperature: 0.3,
            max_tokens: Some(256),
            ..Default::default()
        };
        let summarizer =
            MapReduceSummarizer::from_config(provider.clone(), &SummarizerConfig::default(), &llm);

        let summary = summarizer
            .summarize("objective", &chunks(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(summary, "done");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|s| *s == (Some(0.3), Some(256))));
    }

    #[test]
    fn test_batch_by_size() {
        let parts = chunks(&["aaaa", "bbbb", "cccccccccccc", "dd"]);
        let batches = batch_by_size(&parts, 10);
        assert_eq!(
            batches,
            vec![vec!["aaaa", "bbbb"], vec!["cccccccccccc"], vec!["dd"]]
        );
    }
}
