// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alpha Vantage intraday quotes proxy.
//!
//! Handles:
//! - Symbol normalization and validation
//! - Translation of provider notices into our error vocabulary
//! - Series normalization into ascending price points
//! - Short-lived in-memory caching per symbol

use crate::error::AppError;
use crate::models::{PricePoint, StockQuote};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SERIES_KEY: &str = "Time Series (5min)";
const CLOSE_KEY: &str = "4. close";
const MAX_SYMBOL_LEN: usize = 12;
const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit reached. Please try again in a minute.";
pub const INVALID_SYMBOL_MESSAGE: &str = "Invalid symbol or provider error.";
pub const NO_DATA_MESSAGE: &str = "No intraday data available.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

/// Quote held in the cache with the time it was fetched.
#[derive(Clone)]
struct CachedQuote {
    quote: StockQuote,
    fetched_at: Instant,
}

/// Shared quote cache keyed by normalized symbol.
type QuoteCache = Arc<DashMap<String, CachedQuote>>;

/// Market data client with a per-symbol cache.
#[derive(Clone)]
pub struct MarketDataService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: QuoteCache,
    ttl: Duration,
}

impl MarketDataService {
    pub fn new(base_url: String, api_key: Option<String>, ttl: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            cache: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch the intraday series for `raw_symbol`.
    ///
    /// Fresh cached quotes are returned without contacting the provider.
    /// Errors are never cached.
    pub async fn get_quote(&self, raw_symbol: &str) -> Result<StockQuote, AppError> {
        let symbol = normalize_symbol(raw_symbol)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::Misconfigured("ALPHA_VANTAGE_KEY"))?;

        if let Some(cached) = self.cache.get(&symbol) {
            if cached.fetched_at.elapsed() < self.ttl {
                tracing::debug!(symbol = %symbol, "Quote cache hit");
                return Ok(cached.quote.clone());
            }
        }

        let url = format!("{}/query", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol.as_str()),
                ("interval", "5min"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(symbol = %symbol, error = %e, "Market data request failed");
                AppError::Upstream(FETCH_FAILED_MESSAGE.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(
                symbol = %symbol,
                status = response.status().as_u16(),
                "Market data provider returned error status"
            );
            return Err(AppError::Upstream(FETCH_FAILED_MESSAGE.to_string()));
        }

        let body: Value = response.json().await.map_err(|e| {
            tracing::warn!(symbol = %symbol, error = %e, "Market data body is not JSON");
            AppError::Upstream(FETCH_FAILED_MESSAGE.to_string())
        })?;

        let quote = parse_intraday(&symbol, &body)?;

        tracing::info!(
            symbol = %symbol,
            points = quote.prices.len(),
            current_price = ?quote.current_price,
            "Fetched intraday quote"
        );

        self.remember(symbol, quote.clone());
        Ok(quote)
    }

    /// Cache a fresh quote, dropping entries that have outlived the TTL.
    fn remember(&self, symbol: String, quote: StockQuote) {
        let ttl = self.ttl;
        self.cache.retain(|_, cached| cached.fetched_at.elapsed() < ttl);
        self.cache.insert(
            symbol,
            CachedQuote {
                quote,
                fetched_at: Instant::now(),
            },
        );
    }
}

/// Trim and uppercase a ticker, rejecting empty or malformed input.
pub fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Missing symbol".to_string()));
    }
    let valid_chars = symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if symbol.len() > MAX_SYMBOL_LEN || !valid_chars {
        return Err(AppError::BadRequest("Invalid symbol".to_string()));
    }
    Ok(symbol)
}

/// Turn a provider response body into a quote.
///
/// A rate-limit notice wins over any data in the same body.
pub fn parse_intraday(symbol: &str, body: &Value) -> Result<StockQuote, AppError> {
    if body.get("Note").is_some() || body.get("Information").is_some() {
        tracing::warn!(symbol, "Market data provider rate limit hit");
        return Err(AppError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
    }

    if body.get("Error Message").is_some() {
        return Err(AppError::BadRequest(INVALID_SYMBOL_MESSAGE.to_string()));
    }

    let series = body
        .get(SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::Upstream(NO_DATA_MESSAGE.to_string()))?;

    let mut points: Vec<PricePoint> = series
        .iter()
        .filter_map(|(time, bucket)| {
            close_price(bucket).map(|price| PricePoint {
                time: time.clone(),
                price,
            })
        })
        .collect();

    sort_by_time(&mut points);

    Ok(StockQuote::from_points(symbol.to_string(), points))
}

/// Closing price of one bucket; the provider sends numbers as strings.
fn close_price(bucket: &Value) -> Option<f64> {
    let price = match bucket.get(CLOSE_KEY)? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

/// Chronological when every key is a provider timestamp, lexicographic otherwise.
fn sort_by_time(points: &mut [PricePoint]) {
    let parsed: Option<Vec<chrono::NaiveDateTime>> = points
        .iter()
        .map(|p| chrono::NaiveDateTime::parse_from_str(&p.time, PROVIDER_TIME_FORMAT).ok())
        .collect();

    match parsed {
        Some(times) => {
            let mut keyed: Vec<_> = times.into_iter().zip(points.iter().cloned()).collect();
            keyed.sort_by_key(|(t, _)| *t);
            for (slot, (_, point)) in points.iter_mut().zip(keyed) {
                *slot = point;
            }
        }
        None => points.sort_by(|a, b| a.time.cmp(&b.time)),
    }
}
