//! Prompts for generated suggestions

use crate::models::{CategoryBudget, DailyExpenseRecord};

/// System instruction sent with every suggestion request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful financial assistant. Always respond in valid JSON as instructed.";

/// Maximum number of tips requested from the model
pub const MAX_GENERATED_SUGGESTIONS: usize = 5;

const EXAMPLE: &str = r#"[{"type": "error", "title": "Travel budget exceeded", "details": "You spent 1200 on Travel, exceeding your budget of 1000."}]"#;

/// Build the user instruction embedding the raw expense and budget data
pub fn suggestion_prompt(
    expenses_by_day: &[DailyExpenseRecord],
    category_budgets: &[CategoryBudget],
) -> String {
    let expenses = serde_json::to_string(expenses_by_day).unwrap_or_else(|_| "[]".to_string());
    let budgets = serde_json::to_string(category_budgets).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Given the following user expenses and category budgets, \
         suggest up to {max} personalized financial tips. \
         Return your answer as a JSON array, where each item is an object with: \
         'type' (error, warning, info), 'title' (short summary), and 'details' (explanation). \
         Example: {example} \
         Expenses: {expenses} Budgets: {budgets}",
        max = MAX_GENERATED_SUGGESTIONS,
        example = EXAMPLE,
        expenses = expenses,
        budgets = budgets,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, Expense};

    #[test]
    fn test_prompt_embeds_data() {
        let days = vec![DailyExpenseRecord {
            day: Some("2024-03-01".to_string()),
            expenses: vec![Expense {
                amount: serde_json::Number::from_f64(42.0),
                category: Some(CategoryRef {
                    id: "c9".to_string(),
                    title: Some("Books".to_string()),
                }),
                ..Default::default()
            }],
        }];
        let budgets = vec![CategoryBudget::new("c9", "Books", 50.0)];

        let prompt = suggestion_prompt(&days, &budgets);

        assert!(prompt.contains("up to 5 personalized financial tips"));
        assert!(prompt.contains("'type' (error, warning, info)"));
        assert!(prompt.contains(r#""_id":"c9""#));
        assert!(prompt.contains(r#""day":"2024-03-01""#));
        assert!(prompt.contains(r#""limit":50.0"#));
    }

    #[test]
    fn test_prompt_with_no_data() {
        let prompt = suggestion_prompt(&[], &[]);
        assert!(prompt.ends_with("Expenses: [] Budgets: []"));
    }
}
