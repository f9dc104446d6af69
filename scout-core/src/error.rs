//! Error types for Scout operations

/// Result type for Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Error types for the Scout toolkit
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// LLM provider call failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding endpoint call failed or returned malformed vectors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Research fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Web search failed
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for ScoutError {
    fn from(s: String) -> Self {
        ScoutError::Other(s)
    }
}

impl From<&str> for ScoutError {
    fn from(s: &str) -> Self {
        ScoutError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for ScoutError {
    fn from(err: anyhow::Error) -> Self {
        ScoutError::Other(err.to_string())
    }
}

/// Failures of a single research fetch.
///
/// None of these are retried; the caller decides whether to retry, skip,
/// or abort.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// URL is not a valid http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Extraction service answered with a non-success status
    #[error("Extraction service returned HTTP {0}")]
    UpstreamFailure(u16),

    /// Extraction service unreachable, timed out, or returned an unreadable body
    #[error("Content extraction failed: {0}")]
    ExtractionFailure(String),

    /// Map-reduce summarization failed
    #[error("Summarization failed: {0}")]
    SummarizationFailure(String),
}

/// Web search failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Query was empty
    #[error("Search query must not be empty")]
    InvalidQuery,

    /// No API key configured for the provider
    #[error("No API key configured for search provider '{provider}'")]
    MissingApiKey { provider: String },

    /// Provider returned a non-success status
    #[error("Search API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Request could not be sent or the body could not be read
    #[error("Search transport error: {0}")]
    Transport(String),
}
