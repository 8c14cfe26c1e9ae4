// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! News items parsed from the RSS feed.

use crate::time_utils::now_rfc3339;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Source label attached to every item from the feed.
pub const FEED_SOURCE: &str = "MarketWatch";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub source: String,
}

impl NewsItem {
    /// Shown instead of an empty feed when the feed cannot be loaded.
    pub fn placeholder() -> Self {
        Self {
            title: "Failed to load live news".to_string(),
            link: "#".to_string(),
            pub_date: now_rfc3339(),
            source: "EnVesto".to_string(),
        }
    }
}
