//! Budget aggregation and threshold rules
//!
//! Rule-based suggestions are deterministic: each category with a positive
//! limit is compared against its trailing spend, and at most one suggestion
//! is emitted per category. The more severe rule is checked first, so a
//! category at 150% only reports "exceeded".

use serde::Serialize;

use crate::models::{CategoryBudget, DailyExpenseRecord, Expense, Suggestion};

/// Percent of the limit at which a budget counts as exceeded
pub const EXCEEDED_PERCENT: f64 = 100.0;

/// Percent of the limit at which a warning is raised
pub const WARNING_PERCENT: f64 = 80.0;

/// Total spend for a category across all days
///
/// Expenses without a category, or with a different category id, are skipped.
pub fn category_spend(expenses_by_day: &[DailyExpenseRecord], category_id: &str) -> f64 {
    expenses_by_day
        .iter()
        .flat_map(|day| day.expenses.iter())
        .filter(|expense| expense.category_id() == Some(category_id))
        .map(Expense::amount)
        .sum()
}

/// Where a category stands against its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// No positive limit set
    NoLimit,
    OnTrack,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoLimit => "no_limit",
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

/// Classify spend against a limit (first match wins)
pub fn classify(spent: f64, limit: f64) -> BudgetStatus {
    if limit <= 0.0 {
        return BudgetStatus::NoLimit;
    }
    let percent = spent / limit * 100.0;
    if percent >= EXCEEDED_PERCENT {
        BudgetStatus::Exceeded
    } else if percent >= WARNING_PERCENT {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    }
}

/// Per-category spend summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatus {
    pub id: String,
    pub title: String,
    pub limit: f64,
    pub spent: f64,
    /// Spend as a percentage of the limit (None when no limit is set)
    pub percent: Option<f64>,
    pub status: BudgetStatus,
}

/// Spend summary for every category, in input order
pub fn budget_statuses(
    expenses_by_day: &[DailyExpenseRecord],
    categories: &[CategoryBudget],
) -> Vec<CategoryStatus> {
    categories
        .iter()
        .map(|category| {
            let spent = category_spend(expenses_by_day, &category.id);
            let limit = category.limit();
            let percent = category.has_limit().then(|| spent / limit * 100.0);
            CategoryStatus {
                id: category.id.clone(),
                title: category.title.clone(),
                limit,
                spent,
                percent,
                status: classify(spent, limit),
            }
        })
        .collect()
}

/// Rule-based suggestions for categories at or over their thresholds
pub fn evaluate_thresholds(
    expenses_by_day: &[DailyExpenseRecord],
    categories: &[CategoryBudget],
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for category in categories.iter().filter(|c| c.has_limit()) {
        let spent = category_spend(expenses_by_day, &category.id);
        let title = &category.title;

        match classify(spent, category.limit()) {
            BudgetStatus::Exceeded => suggestions.push(Suggestion::error(
                format!("{} budget exceeded", title),
                format!("You have exceeded your budget for {}!", title),
            )),
            BudgetStatus::Warning => suggestions.push(Suggestion::error(
                format!("{} budget at 80%", title),
                format!("You have reached 80% of your budget for {}.", title),
            )),
            BudgetStatus::OnTrack | BudgetStatus::NoLimit => {}
        }
    }

    tracing::debug!(
        categories = categories.len(),
        suggestions = suggestions.len(),
        "Threshold evaluation complete"
    );

    suggestions
}
