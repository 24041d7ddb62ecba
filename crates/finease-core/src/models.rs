//! Data models for FinEase suggestions
//!
//! Upstream records keep every field the backend sends (via flattened
//! `extra` maps) so the generative adapter can embed the raw data in its
//! prompt, while the threshold logic only reads the typed fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Severity of a suggestion, as rendered by the client toast
///
/// Model replies are passed through as-is, so values outside the three known
/// severities are kept verbatim in `Other` (the client renders them as info).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuggestionType {
    Error,
    Warning,
    #[default]
    Info,
    Other(String),
}

impl SuggestionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SuggestionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "error" => Self::Error,
            "warning" => Self::Warning,
            "info" => Self::Info,
            _ => Self::Other(raw),
        }
    }
}

impl From<SuggestionType> for String {
    fn from(kind: SuggestionType) -> Self {
        match kind {
            SuggestionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single advisory message
///
/// Missing fields default (type `info`, empty strings) and unknown fields
/// are carried through, so generated items reach the client unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type", default)]
    pub kind: SuggestionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Suggestion {
    pub fn new(kind: SuggestionType, title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            details: details.into(),
            extra: Map::new(),
        }
    }

    pub fn error(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(SuggestionType::Error, title, details)
    }
}

/// Response body of the suggestion service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Reference from an expense to its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A single expense as returned by the upstream dashboard endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Amount exactly as sent upstream (integers stay integers in the prompt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    /// Remaining upstream fields (title, note, paymentMethod, date, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Expense {
    /// Amount as a float; missing counts as zero
    pub fn amount(&self) -> f64 {
        self.amount.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }

    /// Category id, if the expense has one
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.id.as_str())
    }
}

/// Expenses recorded on a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Limit value used when no budget has been set
pub const NO_LIMIT: f64 = -1.0;

/// A category together with the user's budget for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Limit exactly as sent upstream; missing and `null` both mean no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryBudget {
    pub fn new(id: impl Into<String>, title: impl Into<String>, limit: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            limit: Number::from_f64(limit),
            extra: Map::new(),
        }
    }

    /// Limit as a float, [`NO_LIMIT`] when unset
    pub fn limit(&self) -> f64 {
        self.limit
            .as_ref()
            .and_then(Number::as_f64)
            .unwrap_or(NO_LIMIT)
    }

    /// Whether a positive limit is set
    pub fn has_limit(&self) -> bool {
        self.limit() > 0.0
    }
}

/// Everything fetched from upstream for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamData {
    pub expenses_by_day: Vec<DailyExpenseRecord>,
    pub category_budgets: Vec<CategoryBudget>,
}

/// Inclusive calendar-date window used for the expenses query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window ending on `end` and starting `days` days earlier
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let start = end - chrono::Duration::days(i64::from(days));
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}
