// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intraday price data returned by the stocks endpoint.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One closing price in the intraday series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PricePoint {
    pub time: String,
    pub price: f64,
}

/// Normalized quote: points ascending by time, last price as current.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StockQuote {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub prices: Vec<PricePoint>,
}

impl StockQuote {
    pub fn from_points(symbol: String, prices: Vec<PricePoint>) -> Self {
        Self {
            current_price: prices.last().map(|p| p.price),
            symbol,
            prices,
        }
    }
}
