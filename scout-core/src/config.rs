//! Configuration types for Scout
//!
//! Configuration is loaded once at startup into a [`ScoutConfig`] and passed
//! by reference into the clients that need it. API keys are resolved from the
//! environment during loading only.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ScoutError};

/// Environment variable holding the Serper API key
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

/// Environment variable holding the Browserless API token
pub const BROWSERLESS_API_KEY_ENV: &str = "BROWSERLESS_API_KEY";

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main configuration for Scout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoutConfig {
    /// Web search provider configuration
    pub search: SearchConfig,

    /// Content-extraction service configuration
    pub extraction: ExtractionConfig,

    /// LLM used by the summarizer
    pub llm: LLMProviderConfig,

    /// Chunking and map-reduce settings
    pub summarizer: SummarizerConfig,

    /// Embedding endpoint configuration
    pub embeddings: EmbeddingsConfig,
}

/// Search provider configuration (Serper)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint
    pub endpoint: String,

    /// API key (prefer `SERPER_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout; `None` keeps the HTTP client default
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Content-extraction service configuration (Browserless)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Service base URL; `/content` is appended
    pub base_url: String,

    /// API token (prefer `BROWSERLESS_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout; `None` keeps the HTTP client default
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://chrome.browserless.io".to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMProviderConfig {
    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion length cap per call; `None` leaves it to the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// API key (prefer `OPENAI_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL (OpenAI-compatible)
    pub base_url: String,

    /// Request timeout
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-1106".to_string(),
            temperature: 0.0,
            max_tokens: None,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Chunking and map-reduce summarization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Content longer than this many characters is summarized
    pub threshold_chars: usize,

    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,

    /// Separators tried in order when splitting
    pub separators: Vec<String>,

    /// Joined partial summaries above this size are collapsed in batches
    pub collapse_max_chars: usize,

    /// Chunks summarized in flight at once during the map step
    pub map_concurrency: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            threshold_chars: 10_000,
            chunk_size: 10_000,
            chunk_overlap: 500,
            separators: vec!["\n\n".to_string(), "\n".to_string()],
            collapse_max_chars: 12_000,
            map_concurrency: 1,
        }
    }
}

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// Model name
    pub model: String,

    /// Expected vector length
    pub dimension: usize,

    /// API key (prefer `OPENAI_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL (OpenAI-compatible)
    pub base_url: String,

    /// Request timeout; `None` keeps the HTTP client default
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimension: 1536,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: None,
        }
    }
}

impl ScoutConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (`scout.toml`, then the path in `SCOUT_CONFIG_PATH`)
    /// 3. `SCOUT_`-prefixed environment overrides (nested keys split on `__`)
    /// 4. Provider API keys from their conventional environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or fails validation.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("SCOUT_CONFIG_PATH").map(std::path::PathBuf::from);
        Self::load_layers(path.as_deref())
    }

    /// Load configuration with `path` in place of `SCOUT_CONFIG_PATH`.
    ///
    /// `scout.toml` and the environment layers still apply, in the same order
    /// as [`ScoutConfig::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or fails validation.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::load_layers(Some(path.as_ref()))
    }

    fn load_layers(path: Option<&std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(ScoutConfig::default()))
            .merge(Toml::file("scout.toml"));

        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("SCOUT_").ignore(&["CONFIG_PATH"]).split("__"));

        let mut config: ScoutConfig = figment.extract().map_err(|e| {
            ScoutError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.apply_env_api_keys();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file over the defaults.
    ///
    /// Neither `scout.toml` nor the environment is consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: ScoutConfig = Figment::from(Serialized::defaults(ScoutConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                ScoutError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Fill unset API keys from `SERPER_API_KEY`, `BROWSERLESS_API_KEY` and
    /// `OPENAI_API_KEY`. Keys already present in the configuration win.
    pub fn apply_env_api_keys(&mut self) {
        fill_from_env(&mut self.search.api_key, SERPER_API_KEY_ENV);
        fill_from_env(&mut self.extraction.api_key, BROWSERLESS_API_KEY_ENV);
        fill_from_env(&mut self.llm.api_key, OPENAI_API_KEY_ENV);
        fill_from_env(&mut self.embeddings.api_key, OPENAI_API_KEY_ENV);
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if splitter settings are inconsistent or an endpoint
    /// is not an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let s = &self.summarizer;
        if s.chunk_size == 0 {
            return Err(ScoutError::Configuration(
                "summarizer.chunk_size must be greater than zero".to_string(),
            ));
        }
        if s.chunk_overlap > s.chunk_size {
            return Err(ScoutError::Configuration(format!(
                "summarizer.chunk_overlap ({}) is larger than chunk_size ({})",
                s.chunk_overlap, s.chunk_size
            )));
        }
        if s.map_concurrency == 0 {
            return Err(ScoutError::Configuration(
                "summarizer.map_concurrency must be at least 1".to_string(),
            ));
        }
        if s.collapse_max_chars == 0 {
            return Err(ScoutError::Configuration(
                "summarizer.collapse_max_chars must be greater than zero".to_string(),
            ));
        }
        if self.embeddings.dimension == 0 {
            return Err(ScoutError::Configuration(
                "embeddings.dimension must be greater than zero".to_string(),
            ));
        }

        for (field, value) in [
            ("search.endpoint", &self.search.endpoint),
            ("extraction.base_url", &self.extraction.base_url),
            ("llm.base_url", &self.llm.base_url),
            ("embeddings.base_url", &self.embeddings.base_url),
        ] {
            validate_http_url(field, value)?;
        }

        Ok(())
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.is_none() {
        *slot = std::env::var(var).ok().filter(|v| !v.is_empty());
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ScoutError::Configuration(format!("{} is not a valid URL: {}", field, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ScoutError::Configuration(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_research_settings() {
        let config = ScoutConfig::default();
        assert_eq!(config.summarizer.threshold_chars, 10_000);
        assert_eq!(config.summarizer.chunk_size, 10_000);
        assert_eq!(config.summarizer.chunk_overlap, 500);
        assert_eq!(config.summarizer.separators, vec!["\n\n", "\n"]);
        assert_eq!(config.llm.model, "gpt-3.5-turbo-1106");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.embeddings.dimension, 1536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides_and_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[summarizer]
chunk_size = 2000
chunk_overlap = 100

[llm]
model = "gpt-4o-mini"
timeout = "30s"
"#
        )
        .unwrap();

        let config = ScoutConfig::from_file(file.path()).unwrap();
        assert_eq!(config.summarizer.chunk_size, 2000);
        assert_eq!(config.summarizer.chunk_overlap, 100);
        assert_eq!(config.summarizer.threshold_chars, 10_000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.extraction.base_url, "https://chrome.browserless.io");
    }

    #[test]
    fn test_overlap_larger_than_chunk_is_rejected() {
        let mut config = ScoutConfig::default();
        config.summarizer.chunk_overlap = config.summarizer.chunk_size + 1;
        assert!(matches!(
            config.validate(),
            Err(ScoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_non_http_endpoint_is_rejected() {
        let mut config = ScoutConfig::default();
        config.extraction.base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extraction.base_url"));
    }

    #[test]
    fn test_configured_key_is_not_replaced() {
        let mut config = ScoutConfig::default();
        config.search.api_key = Some("from-file".to_string());
        config.apply_env_api_keys();
        assert_eq!(config.search.api_key.as_deref(), Some("from-file"));
    }

    fn jail_error(err: ScoutError) -> figment::Error {
        figment::Error::from(err.to_string())
    }

    #[test]
    fn test_load_applies_nested_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "scout.toml",
                r#"
[summarizer]
threshold_chars = 8000
chunk_size = 4000
"#,
            )?;
            jail.set_env("SCOUT_SUMMARIZER__THRESHOLD_CHARS", "5000");
            jail.set_env("SCOUT_LLM__MODEL", "gpt-4o-mini");

            let config = ScoutConfig::load().map_err(jail_error)?;
            assert_eq!(config.summarizer.threshold_chars, 5000);
            assert_eq!(config.summarizer.chunk_size, 4000);
            assert_eq!(config.llm.model, "gpt-4o-mini");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_keeps_env_layers() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "research.toml",
                r#"
[summarizer]
threshold_chars = 8000

[llm]
model = "from-file"
"#,
            )?;
            jail.set_env("SCOUT_SUMMARIZER__THRESHOLD_CHARS", "5000");
            jail.set_env("OPENAI_API_KEY", "env-openai");

            let config = ScoutConfig::load_from("research.toml").map_err(jail_error)?;
            assert_eq!(config.summarizer.threshold_chars, 5000);
            assert_eq!(config.llm.model, "from-file");
            assert_eq!(config.llm.api_key.as_deref(), Some("env-openai"));
            Ok(())
        });
    }

    #[test]
    fn test_load_reads_config_path_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[summarizer]\nchunk_overlap = 250\n")?;
            jail.set_env("SCOUT_CONFIG_PATH", "custom.toml");

            let config = ScoutConfig::load().map_err(jail_error)?;
            assert_eq!(config.summarizer.chunk_overlap, 250);
            Ok(())
        });
    }

    #[test]
    fn test_load_falls_back_to_api_key_env_vars() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(SERPER_API_KEY_ENV, "env-serper");
            jail.set_env(BROWSERLESS_API_KEY_ENV, "env-browserless");
            jail.set_env(OPENAI_API_KEY_ENV, "env-openai");

            let config = ScoutConfig::load().map_err(jail_error)?;
            assert_eq!(config.search.api_key.as_deref(), Some("env-serper"));
            assert_eq!(config.extraction.api_key.as_deref(), Some("env-browserless"));
            assert_eq!(config.llm.api_key.as_deref(), Some("env-openai"));
            assert_eq!(config.embeddings.api_key.as_deref(), Some("env-openai"));
            Ok(())
        });
    }

    #[test]
    fn test_file_key_wins_over_env_var() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "scout.toml",
                r#"
[search]
api_key = "file-serper"
"#,
            )?;
            jail.set_env(SERPER_API_KEY_ENV, "env-serper");

            let config = ScoutConfig::load().map_err(jail_error)?;
            assert_eq!(config.search.api_key.as_deref(), Some("file-serper"));
            Ok(())
        });
    }
}
