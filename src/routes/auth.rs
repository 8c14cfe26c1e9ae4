// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{removal_cookie, session_cookie};
use crate::models::UserProfile;
use crate::services::session::{LoginRequest, SessionGrant, SignupRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Profile plus session token. The token is also set as a cookie.
#[derive(Serialize)]
pub struct SessionResponse {
    pub profile: UserProfile,
    pub token: String,
}

fn with_session(
    state: &AppState,
    jar: CookieJar,
    grant: SessionGrant,
) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.add(session_cookie(
        grant.token.clone(),
        state.config.secure_cookies(),
    ));
    (
        jar,
        Json(SessionResponse {
            profile: grant.profile,
            token: grant.token,
        }),
    )
}

/// Create an account.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let Json(request) = payload?;
    let grant = state.session_service.signup(request).await?;
    let (jar, body) = with_session(&state, jar, grant);
    Ok((StatusCode::CREATED, jar, body))
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let Json(request) = payload?;
    let grant = state.session_service.login(request).await?;
    Ok(with_session(&state, jar, grant))
}

/// Logout - drops the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    tracing::info!("User logged out");
    let jar = jar.remove(removal_cookie(state.config.secure_cookies()));
    (StatusCode::NO_CONTENT, jar)
}
