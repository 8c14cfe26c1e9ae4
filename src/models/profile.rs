// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile record and the partial update submitted by the profile form.

use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// States and union territories offered by the profile form.
pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Puducherry",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Lakshadweep",
    "Andaman and Nicobar Islands",
];

/// User profile stored at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Identity provider user ID (also used as document ID)
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_monthly_income: Option<f64>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
    /// Last successful login (RFC 3339)
    pub last_login: String,
}

impl UserProfile {
    /// Minimal record for a user with no stored profile yet.
    pub fn baseline(uid: &str, email: &str, display_name: Option<&str>) -> Self {
        let now = now_rfc3339();
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_display_name(email)),
            name: None,
            age: None,
            phone: None,
            job: None,
            state: None,
            avg_monthly_income: None,
            created_at: now.clone(),
            last_login: now,
        }
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub fn merged(self, update: ProfileUpdate) -> Self {
        let update = update.normalized();
        Self {
            email: update.email.unwrap_or(self.email),
            display_name: update.display_name.unwrap_or(self.display_name),
            name: update.name.or(self.name),
            age: update.age.or(self.age),
            phone: update.phone.or(self.phone),
            job: update.job.or(self.job),
            state: update.state.or(self.state),
            avg_monthly_income: update.avg_monthly_income.or(self.avg_monthly_income),
            ..self
        }
    }

    pub fn with_last_login(self, last_login: String) -> Self {
        Self { last_login, ..self }
    }
}

/// Display name derived from the local part of an email address.
pub fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

/// Partial profile submitted by the profile form.
///
/// Only fields that are present are validated and merged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(custom(function = "validate_required_name"))]
    pub name: Option<String>,
    #[validate(range(min = 15, max = 100, message = "Age must be between 15 and 100"))]
    pub age: Option<u32>,
    #[validate(custom(function = "validate_profile_email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_required_job"))]
    pub job: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Income must be greater than 0"))]
    pub avg_monthly_income: Option<f64>,
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,
    pub display_name: Option<String>,
}

impl ProfileUpdate {
    /// Trim string fields; blank display names are dropped.
    fn normalized(self) -> Self {
        let trim = |s: Option<String>| s.map(|v| v.trim().to_string());
        Self {
            name: trim(self.name),
            email: trim(self.email),
            phone: trim(self.phone),
            job: trim(self.job),
            state: trim(self.state),
            display_name: trim(self.display_name).filter(|n| !n.is_empty()),
            ..self
        }
    }
}

/// Loose email shape check: `local@domain.tld`, no whitespace.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_required_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("required", "Name is required"));
    }
    Ok(())
}

fn validate_required_job(job: &str) -> Result<(), ValidationError> {
    if job.trim().is_empty() {
        return Err(field_error("required", "Job is required"));
    }
    Ok(())
}

fn validate_profile_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(field_error("required", "Email is required"));
    }
    if !looks_like_email(email) {
        return Err(field_error("email", "Invalid email"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(field_error("required", "Phone is required"));
    }
    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error("phone", "Phone must be 10 digits"));
    }
    Ok(())
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    let state = state.trim();
    if state.is_empty() {
        return Err(field_error("required", "State is required"));
    }
    if !INDIAN_STATES.contains(&state) {
        return Err(field_error("state", "Unknown state"));
    }
    Ok(())
}
