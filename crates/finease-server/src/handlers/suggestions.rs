//! Budget suggestion handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use finease_core::SuggestionsResponse;

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    /// End user's bearer token for the upstream backend
    pub token: Option<String>,
}

/// GET /suggestions?token=... - Rule-based and generated suggestions for a user
pub async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing token query parameter"))?;

    let response = state
        .engine
        .compute_suggestions(token)
        .await
        .map_err(|e| {
            if e.is_upstream() {
                AppError::bad_gateway("Failed to fetch data from backend", e)
            } else {
                AppError::from(e)
            }
        })?;

    info!(
        count = response.suggestions.len(),
        "Returning suggestions"
    );

    Ok(Json(response))
}
