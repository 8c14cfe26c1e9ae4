// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! RSS news feed proxy.
//!
//! The feed is fetched server-side so browsers avoid cross-origin limits.
//! It is never cached.

use crate::error::AppError;
use crate::models::news::{NewsItem, FEED_SOURCE};
use axum::http::header;
use serde::Deserialize;

pub const DEFAULT_ITEM_LIMIT: usize = 5;
pub const MAX_ITEM_LIMIT: usize = 20;

#[derive(Clone)]
pub struct NewsService {
    http: reqwest::Client,
    feed_url: String,
}

#[derive(Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

/// Elements are matched by local name, so `<media:title>` lands next to
/// `<title>`. Each field collects every match and the first non-empty wins.
#[derive(Deserialize)]
struct RssItem {
    #[serde(rename = "title", default)]
    titles: Vec<String>,
    #[serde(rename = "link", default)]
    links: Vec<String>,
    #[serde(rename = "pubDate", default)]
    pub_dates: Vec<String>,
}

impl NewsService {
    pub fn new(feed_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            feed_url,
        }
    }

    /// Raw feed body, unmodified.
    pub async fn fetch_raw(&self) -> Result<String, AppError> {
        let response = self
            .http
            .get(&self.feed_url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("News feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "News feed returned HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("News feed body unreadable: {}", e)))
    }

    /// Up to `limit` parsed items, or a single placeholder when the feed
    /// cannot be fetched or parsed.
    pub async fn latest(&self, limit: usize) -> Vec<NewsItem> {
        let parsed = match self.fetch_raw().await {
            Ok(xml) => parse_feed(&xml, limit),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to placeholder news item");
                vec![NewsItem::placeholder()]
            }
        }
    }
}

/// Parse RSS 2.0 into at most `limit` items, keeping feed order.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<NewsItem>, AppError> {
    let rss: Rss = quick_xml::de::from_str(xml)
        .map_err(|e| AppError::Upstream(format!("Malformed news feed: {}", e)))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .take(limit)
        .map(|item| NewsItem {
            title: first_non_empty(item.titles).unwrap_or_else(|| "No title".to_string()),
            link: first_non_empty(item.links).unwrap_or_else(|| "#".to_string()),
            pub_date: first_non_empty(item.pub_dates).unwrap_or_default(),
            source: FEED_SOURCE.to_string(),
        })
        .collect())
}

fn first_non_empty(values: Vec<String>) -> Option<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
