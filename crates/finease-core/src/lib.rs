//! FinEase Core Library
//!
//! The suggestion pipeline behind the FinEase budget toasts:
//! - Upstream client for expenses-by-day and category budgets
//! - Per-category spend aggregation and budget threshold rules
//! - Pluggable language-model backends for generated tips
//! - Tolerant parsing of model replies
//! - Engine that merges rule-based and generated suggestions

pub mod ai;
pub mod budget;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod prompts;
pub mod upstream;

/// Test utilities including mock upstream and chat-completion servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIClient, MockBackend, OpenAICompatibleBackend, SuggestionBackend};
pub use budget::{budget_statuses, category_spend, evaluate_thresholds, BudgetStatus, CategoryStatus};
pub use config::{EngineConfig, ModelConfig};
pub use engine::{merge_suggestions, SuggestionEngine, TRAILING_WINDOW_DAYS};
pub use error::{Error, Result};
pub use models::{
    CategoryBudget, CategoryRef, DailyExpenseRecord, DateWindow, Expense, Suggestion,
    SuggestionType, SuggestionsResponse, UpstreamData,
};
pub use upstream::UpstreamClient;
