// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Provider credentials are optional at startup. A feature whose credential
//! is missing answers with a clean 500 instead of taking the server down.

use std::env;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_NEWS_FEED_URL: &str = "https://feeds.marketwatch.com/marketwatch/topstories/";
const DEFAULT_CHATBOT_EMBED_URL: &str = "https://cdn.botpress.cloud/webchat/v3.2/shareable.html?configUrl=https://files.bpcontent.cloud/2025/08/26/13/20250826133651-4JSQGH2N.json";
const DEFAULT_QUOTE_CACHE_TTL_SECS: u64 = 60;

/// Which document store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// GCP project hosting Firestore (None runs the store offline)
    pub gcp_project_id: Option<String>,
    /// Document store backend
    pub store_backend: StoreBackend,

    /// Firebase Web API key for the Identity Toolkit REST API
    pub firebase_api_key: Option<String>,
    pub identity_base_url: String,

    /// Alpha Vantage API key
    pub alpha_vantage_key: Option<String>,
    pub market_data_base_url: String,
    /// How long a fetched quote is served from memory
    pub quote_cache_ttl_secs: u64,

    pub news_feed_url: String,
    pub chatbot_embed_url: String,

    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("DOCUMENT_STORE")
            .unwrap_or_else(|_| "firestore".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("DOCUMENT_STORE")),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: optional_var("GCP_PROJECT_ID"),
            store_backend,

            firebase_api_key: optional_var("FIREBASE_API_KEY"),
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_BASE_URL.to_string()),

            alpha_vantage_key: optional_var("ALPHA_VANTAGE_KEY"),
            market_data_base_url: env::var("MARKET_DATA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MARKET_DATA_BASE_URL.to_string()),
            quote_cache_ttl_secs: match env::var("QUOTE_CACHE_TTL_SECS") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("QUOTE_CACHE_TTL_SECS"))?,
                Err(_) => DEFAULT_QUOTE_CACHE_TTL_SECS,
            },

            news_feed_url: env::var("NEWS_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_NEWS_FEED_URL.to_string()),
            chatbot_embed_url: env::var("CHATBOT_EMBED_URL")
                .unwrap_or_else(|_| DEFAULT_CHATBOT_EMBED_URL.to_string()),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Session cookies are marked Secure unless the frontend runs on plain http.
    pub fn secure_cookies(&self) -> bool {
        !self.frontend_url.starts_with("http://")
    }

    /// Config for tests: in-memory store, no provider credentials.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            gcp_project_id: None,
            store_backend: StoreBackend::Memory,
            firebase_api_key: None,
            identity_base_url: "http://127.0.0.1:9".to_string(),
            alpha_vantage_key: None,
            market_data_base_url: "http://127.0.0.1:9".to_string(),
            quote_cache_ttl_secs: DEFAULT_QUOTE_CACHE_TTL_SECS,
            news_feed_url: "http://127.0.0.1:9/feed".to_string(),
            chatbot_embed_url: DEFAULT_CHATBOT_EMBED_URL.to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Read an env var, treating empty values as unset. Secrets are trimmed.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
