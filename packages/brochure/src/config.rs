//! Configuration for the brochure pipeline.
//!
//! Built once at process start and passed into every component that
//! issues model calls; there is no hidden global state.

use std::time::Duration;

use crate::error::{BrochureError, Result};

/// OpenAI keys start with `sk-` (project keys with `sk-proj-`, which the
/// same prefix covers).
const API_KEY_PREFIX: &str = "sk-";

/// Check whether a credential looks like an OpenAI API key.
pub fn validate_api_key(api_key: &str) -> bool {
    api_key.starts_with(API_KEY_PREFIX)
}

/// Process-wide configuration for brochure generation.
#[derive(Debug, Clone)]
pub struct BrochureConfig {
    /// OpenAI API key, validated by format at construction
    pub api_key: String,

    /// Model used for both link selection and synthesis
    pub model: String,

    /// Timeout for a single page fetch
    pub page_timeout: Duration,

    /// Timeout for the link-selection call
    pub selection_timeout: Duration,

    /// Timeout for the streaming synthesis call
    pub synthesis_timeout: Duration,

    /// Politeness delay between successive link fetches
    pub link_delay: Duration,

    /// Maximum selected links ever fetched
    pub max_links: usize,

    /// Maximum seed-page links shown to the selector
    pub max_links_in_prompt: usize,

    /// Hard cap on corpus length, in characters
    pub corpus_cap: usize,
}

impl BrochureConfig {
    /// Create a configuration with the given API key and default tunables.
    ///
    /// Fails if the key does not carry the expected prefix; no request
    /// may proceed on a malformed credential.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if !validate_api_key(&api_key) {
            return Err(BrochureError::Config(
                "API key does not look like an OpenAI key (expected an sk- prefix)".into(),
            ));
        }
        Ok(Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            page_timeout: Duration::from_secs(10),
            selection_timeout: Duration::from_secs(30),
            synthesis_timeout: Duration::from_secs(60),
            link_delay: Duration::from_secs(1),
            max_links: 20,
            max_links_in_prompt: 50,
            corpus_cap: 25_000,
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| BrochureError::Config("OPENAI_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-page fetch timeout.
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Set the inter-link politeness delay.
    pub fn with_link_delay(mut self, delay: Duration) -> Self {
        self.link_delay = delay;
        self
    }

    /// Set the corpus character cap.
    pub fn with_corpus_cap(mut self, cap: usize) -> Self {
        self.corpus_cap = cap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("sk-abc123"));
        assert!(validate_api_key("sk-proj-abc123"));
        assert!(!validate_api_key(""));
        assert!(!validate_api_key("api-key"));
        assert!(!validate_api_key("SK-abc"));
    }

    #[test]
    fn test_config_rejects_malformed_key() {
        assert!(BrochureConfig::new("not-a-key").is_err());
        assert!(BrochureConfig::new("sk-test").is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = BrochureConfig::new("sk-test").unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.page_timeout, Duration::from_secs(10));
        assert_eq!(config.selection_timeout, Duration::from_secs(30));
        assert_eq!(config.synthesis_timeout, Duration::from_secs(60));
        assert_eq!(config.link_delay, Duration::from_secs(1));
        assert_eq!(config.max_links, 20);
        assert_eq!(config.max_links_in_prompt, 50);
        assert_eq!(config.corpus_cap, 25_000);
    }
}
