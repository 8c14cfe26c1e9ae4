// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ExpenseItem, ExpenseList, ExpenseSummary, ProfileUpdate, UserProfile};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
        .route("/api/expenses/calculate", post(calculate))
        .route("/api/expenses", get(list_expenses).post(save_expenses))
        .route("/api/expenses/{id}", delete(delete_expenses))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.session_service.current_profile(&user.uid).await?;
    Ok(Json(profile))
}

/// Merge the submitted fields into the profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    let Json(update) = payload?;
    let profile = state.session_service.update_profile(&user, update).await?;
    Ok(Json(profile))
}

// ─── Expenses ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest {
    items: Vec<ExpenseItem>,
    /// Overrides the income stored in the profile
    #[serde(default)]
    monthly_income: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalculateResponse {
    pub total: f64,
    pub summary: ExpenseSummary,
}

async fn calculate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>> {
    let Json(request) = payload?;
    let (total, summary) = state
        .expense_service
        .calculate(&user.uid, &request.items, request.monthly_income)
        .await?;
    Ok(Json(CalculateResponse { total, summary }))
}

#[derive(Deserialize)]
struct SaveExpenseListRequest {
    items: Vec<ExpenseItem>,
}

/// Saved lists, newest first.
async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExpenseList>>> {
    let lists = state.expense_service.list(&user.uid).await?;
    tracing::debug!(uid = %user.uid, count = lists.len(), "Fetched expense lists");
    Ok(Json(lists))
}

async fn save_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<SaveExpenseListRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseList>)> {
    let Json(request) = payload?;
    let list = state.expense_service.save(&user.uid, request.items).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// Delete a saved list. Unknown ids succeed.
async fn delete_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.expense_service.delete(&user.uid, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
