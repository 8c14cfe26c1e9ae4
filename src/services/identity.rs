// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Identity Toolkit REST API).
//!
//! Handles:
//! - Email/password account creation
//! - Email/password sign-in
//! - Translation of provider error codes into user-facing messages

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Account returned by sign-up and sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAccount {
    /// Provider user ID
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: String,
}

/// Failure talking to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Provider rejected the request with an error code such as `EMAIL_EXISTS`.
    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("identity provider unreachable: {0}")]
    Network(String),

    #[error("identity provider API key not configured")]
    NotConfigured,
}

impl IdentityClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Create an email/password account.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        self.password_call("accounts:signUp", email, password).await
    }

    /// Authenticate with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        self.password_call("accounts:signInWithPassword", email, password)
            .await
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        let api_key = self.api_key.as_deref().ok_or(IdentityError::NotConfigured)?;
        let url = format!("{}/v1/{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let code = provider_error_code(&body);
            tracing::warn!(method, status = status.as_u16(), code = %code, "Identity provider rejected request");
            return Err(IdentityError::Provider(code));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("MALFORMED_RESPONSE: {}", e)))
    }
}

/// Extract the bare error code from a provider error body.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be...`.
fn provider_error_code(body: &str) -> String {
    serde_json::from_str::<ProviderErrorBody>(body)
        .map(|b| {
            b.error
                .message
                .split(" : ")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_else(|_| "UNKNOWN".to_string())
}

/// User-facing authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("An account with this email already exists. Please log in instead.")]
    EmailAlreadyInUse,

    #[error("Invalid email format. Please enter a valid email address.")]
    InvalidEmail,

    #[error("Email/password accounts are not enabled. Please contact support.")]
    OperationNotAllowed,

    #[error("Password is too weak. Please choose a stronger password.")]
    WeakPassword,

    #[error("Network error. Please check your internet connection.")]
    NetworkRequestFailed,

    #[error("An error occurred during registration. Please try again.")]
    RegistrationFailed,

    #[error("Invalid email or password. Please check your credentials and try again.")]
    InvalidCredential,

    #[error("No account exists with this email. Please sign up first.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("This account has been disabled. Please contact support.")]
    UserDisabled,

    #[error("Too many failed login attempts. Please try again later.")]
    TooManyRequests,

    #[error("An error occurred during login. Please try again.")]
    LoginFailed,
}

impl AuthFailure {
    /// Map a sign-up failure.
    pub fn from_signup(err: &IdentityError) -> Self {
        match err {
            IdentityError::Provider(code) => match code.as_str() {
                "EMAIL_EXISTS" => AuthFailure::EmailAlreadyInUse,
                "INVALID_EMAIL" => AuthFailure::InvalidEmail,
                "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
                    AuthFailure::OperationNotAllowed
                }
                "WEAK_PASSWORD" => AuthFailure::WeakPassword,
                _ => AuthFailure::RegistrationFailed,
            },
            IdentityError::Network(_) => AuthFailure::NetworkRequestFailed,
            IdentityError::NotConfigured => AuthFailure::RegistrationFailed,
        }
    }

    /// Map a sign-in failure. Network trouble falls back to the generic message.
    pub fn from_login(err: &IdentityError) -> Self {
        match err {
            IdentityError::Provider(code) => match code.as_str() {
                "INVALID_LOGIN_CREDENTIALS" => AuthFailure::InvalidCredential,
                "EMAIL_NOT_FOUND" => AuthFailure::UserNotFound,
                "INVALID_PASSWORD" => AuthFailure::WrongPassword,
                "INVALID_EMAIL" => AuthFailure::InvalidEmail,
                "USER_DISABLED" => AuthFailure::UserDisabled,
                "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthFailure::TooManyRequests,
                _ => AuthFailure::LoginFailed,
            },
            IdentityError::Network(_) | IdentityError::NotConfigured => AuthFailure::LoginFailed,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthFailure::EmailAlreadyInUse => StatusCode::CONFLICT,
            AuthFailure::InvalidEmail | AuthFailure::WeakPassword => StatusCode::BAD_REQUEST,
            AuthFailure::OperationNotAllowed | AuthFailure::UserDisabled => StatusCode::FORBIDDEN,
            AuthFailure::NetworkRequestFailed => StatusCode::SERVICE_UNAVAILABLE,
            AuthFailure::InvalidCredential | AuthFailure::WrongPassword => {
                StatusCode::UNAUTHORIZED
            }
            AuthFailure::UserNotFound => StatusCode::NOT_FOUND,
            AuthFailure::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AuthFailure::RegistrationFailed | AuthFailure::LoginFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::EmailAlreadyInUse => "email_already_in_use",
            AuthFailure::InvalidEmail => "invalid_email",
            AuthFailure::OperationNotAllowed => "operation_not_allowed",
            AuthFailure::WeakPassword => "weak_password",
            AuthFailure::NetworkRequestFailed => "network_request_failed",
            AuthFailure::RegistrationFailed => "registration_failed",
            AuthFailure::InvalidCredential => "invalid_credential",
            AuthFailure::UserNotFound => "user_not_found",
            AuthFailure::WrongPassword => "wrong_password",
            AuthFailure::UserDisabled => "user_disabled",
            AuthFailure::TooManyRequests => "too_many_requests",
            AuthFailure::LoginFailed => "login_failed",
        }
    }
}
