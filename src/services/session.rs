// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and profile maintenance.
//!
//! Wraps the identity provider and mirrors each user's profile into the
//! document store at `users/{uid}`.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::profile::looks_like_email;
use crate::models::{ProfileUpdate, UserProfile};
use crate::services::identity::{AuthFailure, IdentityClient, IdentityError};
use crate::time_utils::now_rfc3339;
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_new_password"))]
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password_present"))]
    pub password: String,
}

/// Profile plus the session token issued for it.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub profile: UserProfile,
    pub token: String,
}

#[derive(Clone)]
pub struct SessionService {
    identity: IdentityClient,
    db: FirestoreDb,
    signing_key: Vec<u8>,
}

impl SessionService {
    pub fn new(identity: IdentityClient, db: FirestoreDb, signing_key: Vec<u8>) -> Self {
        Self {
            identity,
            db,
            signing_key,
        }
    }

    /// Create an account and its profile record.
    ///
    /// Input is validated before the provider is contacted. A failed profile
    /// write does not fail the signup; login recreates a missing profile.
    pub async fn signup(&self, request: SignupRequest) -> Result<SessionGrant, AppError> {
        request.validate()?;
        let email = request.email.trim();

        let account = self
            .identity
            .sign_up(email, &request.password)
            .await
            .map_err(|e| identity_error(e, AuthFailure::from_signup))?;

        let profile = UserProfile::baseline(
            &account.local_id,
            &account.email,
            request.display_name.as_deref(),
        );

        if let Err(e) = self.db.upsert_profile(&profile).await {
            tracing::warn!(uid = %profile.uid, error = %e, "Failed to save new profile, continuing anyway");
        }

        tracing::info!(uid = %profile.uid, "User signed up");
        self.grant(profile)
    }

    /// Authenticate and refresh `lastLogin`.
    pub async fn login(&self, request: LoginRequest) -> Result<SessionGrant, AppError> {
        request.validate()?;
        let email = request.email.trim();

        let account = self
            .identity
            .sign_in_with_password(email, &request.password)
            .await
            .map_err(|e| identity_error(e, AuthFailure::from_login))?;

        let profile = match self.db.get_profile(&account.local_id).await? {
            Some(profile) => profile,
            None => {
                tracing::warn!(uid = %account.local_id, "Profile missing at login, recreating");
                UserProfile::baseline(
                    &account.local_id,
                    &account.email,
                    account.display_name.as_deref(),
                )
            }
        }
        .with_last_login(now_rfc3339());

        self.db.upsert_profile(&profile).await?;

        tracing::info!(uid = %profile.uid, "User logged in");
        self.grant(profile)
    }

    pub async fn current_profile(&self, uid: &str) -> Result<UserProfile, AppError> {
        self.db
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", uid)))
    }

    /// Merge a partial update into the stored profile.
    ///
    /// Users without a stored profile get a baseline record first.
    pub async fn update_profile(
        &self,
        user: &AuthUser,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AppError> {
        update.validate()?;

        let existing = match self.db.get_profile(&user.uid).await? {
            Some(profile) => profile,
            None => UserProfile::baseline(&user.uid, &user.email, None),
        };

        let profile = existing.merged(update);
        self.db.upsert_profile(&profile).await?;

        tracing::info!(uid = %user.uid, "Profile updated");
        Ok(profile)
    }

    fn grant(&self, profile: UserProfile) -> Result<SessionGrant, AppError> {
        let token = create_jwt(&profile.uid, &profile.email, &self.signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
        Ok(SessionGrant { profile, token })
    }
}

fn identity_error(err: IdentityError, map: fn(&IdentityError) -> AuthFailure) -> AppError {
    match err {
        IdentityError::NotConfigured => AppError::Misconfigured("FIREBASE_API_KEY"),
        other => AppError::Auth(map(&other)),
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(field_error("required", "Email is required"));
    }
    if !looks_like_email(email) {
        return Err(field_error("email", "Email is invalid"));
    }
    Ok(())
}

fn validate_password_present(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(field_error("required", "Password is required"));
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    validate_password_present(password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(field_error(
            "min_length",
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        let request = SignupRequest {
            email: "gig@example.com".to_string(),
            password: "short".to_string(),
            display_name: None,
        };
        let errors = request.validate().unwrap_err();
        let password = &errors.field_errors()["password"][0];
        assert_eq!(
            password.message.as_deref(),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_login_only_requires_presence() {
        let request = LoginRequest {
            email: "gig@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["email"][0].message.as_deref(), Some("Email is invalid"));
        assert_eq!(
            fields["password"][0].message.as_deref(),
            Some("Password is required")
        );
    }

    #[tokio::test]
    async fn test_signup_without_api_key_is_misconfigured() {
        let service = SessionService::new(
            IdentityClient::new("http://127.0.0.1:9".to_string(), None),
            FirestoreDb::new_in_memory(),
            b"key".to_vec(),
        );
        let result = service
            .signup(SignupRequest {
                email: "gig@example.com".to_string(),
                password: "long enough".to_string(),
                display_name: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(AppError::Misconfigured("FIREBASE_API_KEY"))
        ));
    }
}
