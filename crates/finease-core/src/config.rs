//! Engine configuration
//!
//! The engine never reads the environment itself: callers build an
//! [`EngineConfig`] (usually via [`EngineConfig::from_env`] in the CLI) and
//! pass it in, so tests can run with fake credentials and local mock servers.
//!
//! Environment variables:
//! - `NODE_API_BASE`: upstream backend base URL
//! - `OPENROUTER_API_KEY`: model API key (generated suggestions are disabled if unset)
//! - `OPENROUTER_URL`: chat-completion base URL (default: https://openrouter.ai/api/v1)
//! - `OPENROUTER_MODEL`: model name (default: deepseek/deepseek-chat-v3-0324:free)
//! - `MODEL_TIMEOUT_SECS`: model call timeout in seconds (default: 30)

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_UPSTREAM_BASE: &str = "https://finease-0dj7.onrender.com/api";
pub const DEFAULT_MODEL_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completion endpoint settings
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    /// Upper bound on a single model call
    pub timeout: Duration,
}

impl ModelConfig {
    /// OpenRouter defaults with the given API key
    pub fn new(api_key: &str) -> Self {
        Self {
            base_url: DEFAULT_MODEL_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.to_string(),
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read model settings from the environment
    ///
    /// Returns `Ok(None)` when `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = non_empty_var("OPENROUTER_API_KEY") else {
            return Ok(None);
        };

        let mut config = Self::new(&api_key);
        if let Some(url) = non_empty_var("OPENROUTER_URL") {
            config = config.with_base_url(&url);
        }
        if let Some(model) = non_empty_var("OPENROUTER_MODEL") {
            config = config.with_model(&model);
        }
        if let Some(secs) = non_empty_var("MODEL_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!("MODEL_TIMEOUT_SECS must be a number, got {:?}", secs))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(Some(config))
    }
}

/// Everything the suggestion engine needs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub upstream_base_url: String,
    /// Model settings; `None` disables generated suggestions
    pub model: Option<ModelConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: DEFAULT_UPSTREAM_BASE.to_string(),
            model: None,
        }
    }
}

impl EngineConfig {
    pub fn new(upstream_base_url: &str) -> Self {
        Self {
            upstream_base_url: upstream_base_url.to_string(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = Some(model);
        self
    }

    /// Read the full configuration from the environment
    pub fn from_env() -> Result<Self> {
        let upstream_base_url =
            non_empty_var("NODE_API_BASE").unwrap_or_else(|| DEFAULT_UPSTREAM_BASE.to_string());

        Ok(Self {
            upstream_base_url,
            model: ModelConfig::from_env()?,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::new("sk-test");
        assert_eq!(config.base_url, DEFAULT_MODEL_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_model_config_builders() {
        let config = ModelConfig::new("k")
            .with_base_url("http://localhost:8080/v1")
            .with_model("llama3.2")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_engine_config_default_has_no_model() {
        let config = EngineConfig::default();
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE);
        assert!(config.model.is_none());
    }
}
