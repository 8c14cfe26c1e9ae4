// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! News feed proxy routes.

use crate::error::{AppError, Result};
use crate::models::NewsItem;
use crate::services::news::{DEFAULT_ITEM_LIMIT, MAX_ITEM_LIMIT};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/news", get(get_raw_feed))
        .route("/api/news/items", get(get_items))
}

/// Raw feed wrapper, parsed by the client.
#[derive(Serialize)]
pub struct FeedContents {
    pub contents: String,
}

async fn get_raw_feed(State(state): State<Arc<AppState>>) -> Result<Json<FeedContents>> {
    let contents = state.news_service.fetch_raw().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to fetch news feed");
        AppError::NewsUnavailable
    })?;
    Ok(Json(FeedContents { contents }))
}

#[derive(Deserialize)]
struct ItemsQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_ITEM_LIMIT
}

/// Parsed headlines; never empty for a well-formed request.
async fn get_items(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ItemsQuery>, QueryRejection>,
) -> Result<Json<Vec<NewsItem>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let limit = params.limit.clamp(1, MAX_ITEM_LIMIT);
    Ok(Json(state.news_service.latest(limit).await))
}
