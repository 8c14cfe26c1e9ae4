// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EnVesto API Server
//!
//! Personal finance backend: accounts and profiles, an expense calculator
//! with saved lists, and proxies for stock quotes and market news.

use envesto::{
    config::{Config, StoreBackend},
    db::FirestoreDb,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting EnVesto API");

    let db = connect_store(&config).await;

    if config.alpha_vantage_key.is_none() {
        tracing::warn!("ALPHA_VANTAGE_KEY not set; stock quotes will fail");
    }
    if config.firebase_api_key.is_none() {
        tracing::warn!("FIREBASE_API_KEY not set; signup and login will fail");
    }

    let port = config.port;
    let state = Arc::new(AppState::new(config, db));

    // Build router
    let app = envesto::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Pick the document store. A Firestore connection failure degrades to an
/// offline store so the proxies keep working.
async fn connect_store(config: &Config) -> FirestoreDb {
    match (&config.store_backend, &config.gcp_project_id) {
        (StoreBackend::Memory, _) => {
            tracing::info!("Using in-memory document store");
            FirestoreDb::new_in_memory()
        }
        (StoreBackend::Firestore, Some(project_id)) => match FirestoreDb::new(project_id).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Firestore; persistence disabled");
                FirestoreDb::new_mock()
            }
        },
        (StoreBackend::Firestore, None) => {
            tracing::warn!("GCP_PROJECT_ID not set; persistence disabled");
            FirestoreDb::new_mock()
        }
    }
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("envesto=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
