//! Suggest command implementation

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finease_core::{
    budget_statuses, CategoryStatus, DateWindow, EngineConfig, SuggestionEngine,
    TRAILING_WINDOW_DAYS,
};

use super::truncate;

pub async fn cmd_suggest(token: &str, rules_only: bool, report: bool) -> Result<()> {
    let mut config = EngineConfig::from_env().context("Invalid engine configuration")?;
    if rules_only {
        config.model = None;
    }

    let engine = SuggestionEngine::new(config);
    let today = chrono::Local::now().date_naive();
    let output = render_suggestions(&engine, token, today, report).await?;
    print!("{}", output);

    Ok(())
}

/// Fetch data for `token` and render the suggestions JSON, optionally
/// preceded by a budget table
pub async fn render_suggestions(
    engine: &SuggestionEngine,
    token: &str,
    today: NaiveDate,
    report: bool,
) -> Result<String> {
    let window = DateWindow::trailing(today, TRAILING_WINDOW_DAYS);
    let data = engine
        .upstream()
        .fetch(token, window)
        .await
        .context("Failed to fetch data from backend")?;

    let mut output = String::new();
    if report {
        let _ = writeln!(
            output,
            "📊 Budgets {} to {}\n",
            window.start_param(),
            window.end_param()
        );
        output.push_str(&format_budget_table(&budget_statuses(
            &data.expenses_by_day,
            &data.category_budgets,
        )));
        output.push('\n');
    }

    let response = engine.compute_from_data(&data).await;
    output.push_str(&serde_json::to_string_pretty(&response)?);
    output.push('\n');

    Ok(output)
}

/// Render category statuses as a fixed-width table
pub fn format_budget_table(statuses: &[CategoryStatus]) -> String {
    if statuses.is_empty() {
        return "   No categories found.\n".to_string();
    }

    let mut table = String::new();
    let _ = writeln!(
        table,
        "   {:<24} {:>10} {:>10} {:>8}  {}",
        "Category", "Spent", "Limit", "Used", "Status"
    );
    let _ = writeln!(table, "   {}", "-".repeat(66));

    for s in statuses {
        let limit = if s.limit > 0.0 {
            format!("{:.2}", s.limit)
        } else {
            "-".to_string()
        };
        let used = s
            .percent
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            table,
            "   {:<24} {:>10.2} {:>10} {:>8}  {}",
            truncate(&s.title, 24),
            s.spent,
            limit,
            used,
            s.status.as_str()
        );
    }

    table
}
