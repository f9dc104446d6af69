//! Factory for creating LLM providers from configuration

use crate::config::LLMProviderConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::llm::providers::openai::OpenAIProvider;
use std::sync::Arc;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created (e.g., missing API key)
    pub fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        let provider = OpenAIProvider::from_config(config)?;
        tracing::debug!(
            model = %provider.model(),
            base_url = %provider.base_url(),
            "Created LLM provider"
        );
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uses_configured_model() {
        let config = LLMProviderConfig {
            api_key: Some("test-key".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let provider = LLMProviderFactory::create(&config).unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "openai");
        assert_eq!(info.model_name, "gpt-4o-mini");
    }

    #[test]
    fn test_create_without_key_fails() {
        assert!(LLMProviderFactory::create(&LLMProviderConfig::default()).is_err());
    }
}
