//! Suggestion engine - fetch, evaluate, generate, merge
//!
//! ```rust,ignore
//! use finease_core::{EngineConfig, SuggestionEngine};
//!
//! let engine = SuggestionEngine::new(EngineConfig::from_env()?);
//! let response = engine.compute_suggestions(&user_token).await?;
//! ```

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info};

use crate::ai::{generate_or_empty, AIClient, OpenAICompatibleBackend, SuggestionBackend};
use crate::budget::evaluate_thresholds;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{DateWindow, Suggestion, SuggestionsResponse, UpstreamData};
use crate::upstream::UpstreamClient;

/// Days of expense history considered per request
pub const TRAILING_WINDOW_DAYS: u32 = 30;

/// Rule-based suggestions first, then generated ones, each in original order
pub fn merge_suggestions(rule_based: Vec<Suggestion>, generated: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut merged = rule_based;
    merged.extend(generated);
    merged
}

/// Stateless suggestion engine
///
/// Holds only configuration and HTTP clients, so one engine can serve many
/// concurrent requests for different users.
#[derive(Clone)]
pub struct SuggestionEngine {
    upstream: UpstreamClient,
    ai: Option<AIClient>,
}

impl SuggestionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let http_client = Client::new();
        let upstream = UpstreamClient::with_client(http_client.clone(), &config.upstream_base_url);
        let ai = config.model.as_ref().map(|model| {
            AIClient::OpenAICompatible(OpenAICompatibleBackend::with_client(http_client, model))
        });

        Self { upstream, ai }
    }

    /// Build from explicit parts (tests, custom backends)
    pub fn with_parts(upstream: UpstreamClient, ai: Option<AIClient>) -> Self {
        Self { upstream, ai }
    }

    /// The configured model client, if any
    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Compute suggestions for the user behind `bearer`
    ///
    /// Upstream failures are returned as errors; model failures only reduce
    /// the number of suggestions.
    pub async fn compute_suggestions(&self, bearer: &str) -> Result<SuggestionsResponse> {
        let today = chrono::Local::now().date_naive();
        self.compute_suggestions_at(bearer, today).await
    }

    /// Same as [`compute_suggestions`](Self::compute_suggestions) with a fixed end date
    pub async fn compute_suggestions_at(
        &self,
        bearer: &str,
        today: NaiveDate,
    ) -> Result<SuggestionsResponse> {
        let window = DateWindow::trailing(today, TRAILING_WINDOW_DAYS);
        let data = self.upstream.fetch(bearer, window).await?;
        debug!(
            days = data.expenses_by_day.len(),
            categories = data.category_budgets.len(),
            start = %window.start,
            end = %window.end,
            "Fetched upstream data"
        );

        Ok(self.compute_from_data(&data).await)
    }

    /// Run the post-fetch pipeline on already fetched data
    pub async fn compute_from_data(&self, data: &UpstreamData) -> SuggestionsResponse {
        let rule_based = self.rule_based(data);
        let generated = match &self.ai {
            Some(ai) => generate_or_empty(ai, data).await,
            None => vec![],
        };

        info!(
            rule_based = rule_based.len(),
            generated = generated.len(),
            model = self.ai.as_ref().map(|a| a.model()).unwrap_or("none"),
            "Computed suggestions"
        );

        SuggestionsResponse {
            suggestions: merge_suggestions(rule_based, generated),
        }
    }

    /// Threshold suggestions only
    pub fn rule_based(&self, data: &UpstreamData) -> Vec<Suggestion> {
        evaluate_thresholds(&data.expenses_by_day, &data.category_budgets)
    }
}
