//! Generated suggestions from an external language model
//!
//! # Architecture
//!
//! - `SuggestionBackend` trait: the interface every model backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//! - [`generate_or_empty`]: the degrading entry point used by the engine
//!
//! Model output is never trusted to be available. Any failure (network,
//! timeout, error status, missing fields, unparseable reply) is logged and
//! turned into an empty list so rule-based suggestions are still returned.

mod mock;
mod openai_compatible;
pub mod parsing;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::models::{Suggestion, UpstreamData};

/// Trait defining the interface for suggestion backends
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Ask the model for suggestions based on the fetched data
    async fn generate_suggestions(&self, data: &UpstreamData) -> Result<Vec<Suggestion>>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible chat completions (OpenRouter, OpenAI, vLLM, ...)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an OpenAI-compatible client from model settings
    pub fn from_config(config: &ModelConfig) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::new(config))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl SuggestionBackend for AIClient {
    async fn generate_suggestions(&self, data: &UpstreamData) -> Result<Vec<Suggestion>> {
        match self {
            AIClient::OpenAICompatible(b) => b.generate_suggestions(data).await,
            AIClient::Mock(b) => b.generate_suggestions(data).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Generate suggestions, degrading to an empty list on any failure
pub async fn generate_or_empty<B: SuggestionBackend + ?Sized>(
    backend: &B,
    data: &UpstreamData,
) -> Vec<Suggestion> {
    match backend.generate_suggestions(data).await {
        Ok(suggestions) => {
            tracing::debug!(
                model = backend.model(),
                count = suggestions.len(),
                "Generated suggestions"
            );
            suggestions
        }
        Err(e) => {
            tracing::warn!(
                model = backend.model(),
                host = backend.host(),
                error = %e,
                "Model suggestions unavailable, continuing without them"
            );
            vec![]
        }
    }
}
