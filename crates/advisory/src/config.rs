//! Configuration for the advisory gateway.

use std::env;
use std::time::Duration;

/// Default completion provider base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Default postal lookup base URL.
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Key shipped in sample configuration files. Treated as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";

/// Configuration for [`AdvisoryGateway`](crate::AdvisoryGateway).
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// Completion provider API key.
    pub openai_api_key: Option<String>,

    /// Completion provider base URL, without trailing slash.
    pub openai_base_url: String,

    /// Model name to use.
    pub openai_model: String,

    /// Maximum tokens for a completion.
    pub max_tokens: u32,

    /// Temperature for generation.
    pub temperature: f32,

    /// Postal lookup base URL, without trailing slash.
    pub viacep_base_url: String,

    /// Timeout applied to every outbound request.
    pub request_timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            viacep_base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AdvisoryConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `OPENAI_API_KEY` - completion provider key (unset disables completions)
    /// - `OPENAI_BASE_URL` - provider URL (default: https://api.openai.com/v1)
    /// - `OPENAI_MODEL` - model name (default: gpt-3.5-turbo)
    /// - `VIACEP_BASE_URL` - postal lookup URL (default: https://viacep.com.br/ws)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let openai_api_key = env::var("OPENAI_API_KEY").ok();

        let openai_base_url = env::var("OPENAI_BASE_URL")
            .map(|url| trim_base_url(&url))
            .unwrap_or(defaults.openai_base_url);

        let openai_model = env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model);

        let viacep_base_url = env::var("VIACEP_BASE_URL")
            .map(|url| trim_base_url(&url))
            .unwrap_or(defaults.viacep_base_url);

        Self {
            openai_api_key,
            openai_base_url,
            openai_model,
            viacep_base_url,
            ..defaults
        }
    }

    /// Create a new config builder.
    pub fn builder() -> AdvisoryConfigBuilder {
        AdvisoryConfigBuilder::default()
    }

    /// Whether a usable completion key is present.
    pub fn is_configured(&self) -> bool {
        matches!(
            self.openai_api_key.as_deref().map(str::trim),
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY
        )
    }
}

/// Builder for AdvisoryConfig.
#[derive(Debug, Default)]
pub struct AdvisoryConfigBuilder {
    config: AdvisoryConfig,
}

impl AdvisoryConfigBuilder {
    /// Set the API key.
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_api_key = Some(key.into());
        self
    }

    /// Set the completion provider base URL.
    pub fn openai_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.openai_base_url = trim_base_url(url.as_ref());
        self
    }

    /// Set the model name.
    pub fn openai_model(mut self, model: impl Into<String>) -> Self {
        self.config.openai_model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the postal lookup base URL.
    pub fn viacep_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.viacep_base_url = trim_base_url(url.as_ref());
        self
    }

    /// Set the outbound request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AdvisoryConfig {
        self.config
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisoryConfig::default();
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.viacep_base_url, "https://viacep.com.br/ws");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_builder() {
        let config = AdvisoryConfig::builder()
            .openai_api_key("sk-test")
            .openai_base_url("http://localhost:9000/v1/")
            .openai_model("test-model")
            .max_tokens(64)
            .temperature(0.2)
            .viacep_base_url("http://localhost:9001/ws/")
            .build();

        assert!(config.is_configured());
        assert_eq!(config.openai_base_url, "http://localhost:9000/v1");
        assert_eq!(config.openai_model, "test-model");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.viacep_base_url, "http://localhost:9001/ws");
    }

    #[test]
    fn test_placeholder_key_is_not_configured() {
        let placeholder = AdvisoryConfig::builder()
            .openai_api_key(PLACEHOLDER_API_KEY)
            .build();
        assert!(!placeholder.is_configured());

        let blank = AdvisoryConfig::builder().openai_api_key("  ").build();
        assert!(!blank.is_configured());
    }
}
