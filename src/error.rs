// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::models::expense::ExpenseError;
use crate::services::identity::AuthFailure;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    Expense(#[from] ExpenseError),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("News feed unavailable")]
    NewsUnavailable,

    #[error("Missing configuration: {0}")]
    Misconfigured(&'static str),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, error) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(errors) => {
                fields = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "Please fix the highlighted errors".to_string(),
                )
            }
            AppError::Body(rejection) => {
                let detail = rejection.body_text();
                let status = match rejection {
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    other => other.status(),
                };
                fields = match rejection {
                    JsonRejection::JsonDataError(_) => body_field_error(&detail),
                    _ => None,
                };
                let error = if fields.is_some() {
                    "Please fix the highlighted errors".to_string()
                } else {
                    detail
                };
                (status, "invalid_body", error)
            }
            AppError::Auth(failure) => (failure.status(), failure.code(), failure.to_string()),
            AppError::Expense(err) => (StatusCode::BAD_REQUEST, "invalid_income", err.to_string()),
            AppError::RateLimited(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", msg.clone())
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone()),
            AppError::NewsUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "news_unavailable",
                "Unable to load news".to_string(),
            ),
            AppError::Misconfigured(var) => {
                tracing::error!(variable = var, "Server misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_misconfigured",
                    "Server misconfigured".to_string(),
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Unable to reach the data store".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Unexpected error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error,
            code,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Per-field messages keyed by the camelCase name the client sent.
fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (camel_case(&field), messages)
        })
        .collect()
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Field path and message from a mistyped JSON body, e.g.
/// `items[0].price: invalid type: string "abc", expected f64`.
fn body_field_error(detail: &str) -> Option<BTreeMap<String, Vec<String>>> {
    let (path, message) = detail.strip_prefix(JSON_DATA_PREFIX)?.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '[' | ']' | '_'));
    is_path.then(|| BTreeMap::from([(path.to_string(), vec![message.to_string()])]))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("avg_monthly_income"), "avgMonthlyIncome");
        assert_eq!(camel_case("email"), "email");
    }

    #[test]
    fn test_body_field_error_extracts_path() {
        let fields = body_field_error(
            "Failed to deserialize the JSON body into the target type: age: invalid value: integer `-3`, expected u32 at line 1 column 10",
        )
        .unwrap();
        assert_eq!(
            fields["age"],
            vec!["invalid value: integer `-3`, expected u32 at line 1 column 10".to_string()]
        );

        // Root-level problems have no field path
        assert!(body_field_error(
            "Failed to deserialize the JSON body into the target type: missing field `items` at line 1 column 2"
        )
        .is_none());
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::RateLimited("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Misconfigured("ALPHA_VANTAGE_KEY"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Expense(ExpenseError::NonPositiveIncome),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Auth(AuthFailure::UserDisabled), StatusCode::FORBIDDEN),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
