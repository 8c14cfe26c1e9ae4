// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EnVesto: personal finance for variable-income earners
//!
//! This crate provides the backend API: signup and login against an
//! external identity provider, profile and expense list storage in
//! Firestore, and thin proxies for intraday stock quotes and a news feed.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ExpenseService, IdentityClient, MarketDataService, NewsService, SessionService};
use std::time::Duration;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub session_service: SessionService,
    pub expense_service: ExpenseService,
    pub market_service: MarketDataService,
    pub news_service: NewsService,
}

impl AppState {
    /// Wire up all services from config and a connected store.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let identity = IdentityClient::new(
            config.identity_base_url.clone(),
            config.firebase_api_key.clone(),
        );
        let session_service =
            SessionService::new(identity, db.clone(), config.jwt_signing_key.clone());
        let expense_service = ExpenseService::new(db.clone());
        let market_service = MarketDataService::new(
            config.market_data_base_url.clone(),
            config.alpha_vantage_key.clone(),
            Duration::from_secs(config.quote_cache_ttl_secs),
        );
        let news_service = NewsService::new(config.news_feed_url.clone());

        Self {
            config,
            db,
            session_service,
            expense_service,
            market_service,
            news_service,
        }
    }
}
