//! Mock backend for testing
//!
//! Returns canned suggestions or a canned failure without any network access.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Suggestion, SuggestionType, UpstreamData};

use super::SuggestionBackend;

/// Mock suggestion backend
#[derive(Clone, Default)]
pub struct MockBackend {
    suggestions: Vec<Suggestion>,
    failure: Option<String>,
}

impl MockBackend {
    /// Mock that returns a single generic tip
    pub fn new() -> Self {
        Self::with_suggestions(vec![Suggestion::new(
            SuggestionType::Info,
            "Review subscriptions",
            "Cancel services you have not used this month.",
        )])
    }

    /// Mock that returns the given suggestions
    pub fn with_suggestions(suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions,
            failure: None,
        }
    }

    /// Mock whose every call fails with a model error
    pub fn failing(reason: &str) -> Self {
        Self {
            suggestions: vec![],
            failure: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl SuggestionBackend for MockBackend {
    async fn generate_suggestions(&self, _data: &UpstreamData) -> Result<Vec<Suggestion>> {
        match &self.failure {
            Some(reason) => Err(Error::ModelCall(reason.clone())),
            None => Ok(self.suggestions.clone()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
