// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intraday stock quote proxy routes.
//!
//! Clients poll these about once a minute; there is no push channel.

use crate::error::{AppError, Result};
use crate::models::StockQuote;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks", get(missing_symbol))
        .route("/api/stocks/{symbol}", get(get_stock))
}

async fn missing_symbol() -> AppError {
    AppError::BadRequest("Missing symbol".to_string())
}

/// Latest intraday series for a ticker.
async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response> {
    let quote: StockQuote = state.market_service.get_quote(&symbol).await?;

    let max_age = state.market_service.cache_ttl().as_secs();
    let cache_control = HeaderValue::from_str(&format!("public, max-age={}", max_age))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid cache header: {}", e)))?;

    Ok(([(header::CACHE_CONTROL, cache_control)], Json(quote)).into_response())
}
