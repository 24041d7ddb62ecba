//! Client for the upstream FinEase backend
//!
//! Two read-only endpoints are used, both authenticated with the end user's
//! bearer token:
//! - `GET /dashboard/expenses-by-day?startDate=..&endDate=..` → `{ data: [...] }`
//! - `GET /categories/user-expense-categories` → `{ categories: [...] }`
//!
//! Failures are not retried; they surface as `Error::UpstreamFetch`.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategoryBudget, DailyExpenseRecord, DateWindow, UpstreamData};

pub const EXPENSES_BY_DAY_PATH: &str = "/dashboard/expenses-by-day";
pub const CATEGORY_BUDGETS_PATH: &str = "/categories/user-expense-categories";

#[derive(Debug, Deserialize)]
struct ExpensesByDayResponse {
    #[serde(default)]
    data: Vec<DailyExpenseRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryBudgetsResponse {
    #[serde(default)]
    categories: Vec<CategoryBudget>,
}

/// Upstream backend client
#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create with a shared HTTP client
    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch expenses and budgets, issuing both reads concurrently
    pub async fn fetch(&self, bearer: &str, window: DateWindow) -> Result<UpstreamData> {
        let (expenses_by_day, category_budgets) = tokio::try_join!(
            self.expenses_by_day(bearer, window),
            self.category_budgets(bearer)
        )?;

        Ok(UpstreamData {
            expenses_by_day,
            category_budgets,
        })
    }

    /// Same as [`fetch`](Self::fetch), one read after the other
    pub async fn fetch_sequential(&self, bearer: &str, window: DateWindow) -> Result<UpstreamData> {
        let expenses_by_day = self.expenses_by_day(bearer, window).await?;
        let category_budgets = self.category_budgets(bearer).await?;

        Ok(UpstreamData {
            expenses_by_day,
            category_budgets,
        })
    }

    /// Expenses grouped by day within the window
    pub async fn expenses_by_day(
        &self,
        bearer: &str,
        window: DateWindow,
    ) -> Result<Vec<DailyExpenseRecord>> {
        let query = [
            ("startDate", window.start_param()),
            ("endDate", window.end_param()),
        ];
        let body: ExpensesByDayResponse = self.get(EXPENSES_BY_DAY_PATH, bearer, &query).await?;
        debug!(days = body.data.len(), "Fetched expenses by day");
        Ok(body.data)
    }

    /// The caller's categories with their budget limits
    pub async fn category_budgets(&self, bearer: &str) -> Result<Vec<CategoryBudget>> {
        let body: CategoryBudgetsResponse = self.get(CATEGORY_BUDGETS_PATH, bearer, &[]).await?;
        debug!(
            categories = body.categories.len(),
            "Fetched category budgets"
        );
        Ok(body.categories)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| Error::upstream(path, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                path,
                format!("status {}: {}", status, truncate(&body, 200)),
            ));
        }

        response.json().await.map_err(|e| Error::upstream(path, e))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
