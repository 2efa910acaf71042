//! Auth error taxonomy and the user-facing message table.
//!
//! ERROR HANDLING
//! ==============
//! Nothing in the auth flow is fatal. Every failure ends as exactly one
//! message in the form or as a silent logout + redirect.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use crate::net::api::ApiError;

pub const RATE_LIMITED_MESSAGE: &str = "Too many login attempts. Try again in an hour.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Body fields whose string arrays are shown verbatim, in priority order.
const FIELD_ERROR_KEYS: [&str; 4] = ["non_field_errors", "username", "password", "email"];

/// Local password rule violations. Never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Password is too weak. Use a more complex password.")]
    WeakPassword,
    #[error("Password must be at least 8 characters long.")]
    TooShort,
    #[error("Passwords do not match.")]
    Mismatch,
}

/// Failures obtaining a bot-mitigation token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttestationError {
    /// The provider script is not loaded or exposes no usable API.
    #[error("reCAPTCHA is not loaded. Check your connection or the site key.")]
    Unavailable,
    /// The provider ran but refused to issue a token.
    #[error("reCAPTCHA error: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Attestation(#[from] AttestationError),

    /// The backend answered a login or registration with an error status.
    #[error("auth exchange rejected: status {status}")]
    Exchange { status: u16, payload: Value },

    /// No response at all, or an unreadable one.
    #[error("network error: {0}")]
    Network(String),

    /// The stored access token was rejected on page load.
    #[error("stored session rejected")]
    Verification,

    /// The refresh endpoint failed; the session was dropped.
    #[error("session refresh failed")]
    Refresh,
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => Self::Exchange { status, payload: body },
            ApiError::SessionExpired => Self::Refresh,
            other => Self::Network(other.to_string()),
        }
    }
}

impl AuthError {
    /// The single message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Attestation(err) => err.to_string(),
            Self::Exchange { status, payload } => exchange_message(*status, payload),
            Self::Network(_) | Self::Verification | Self::Refresh => FALLBACK_MESSAGE.to_owned(),
        }
    }

    /// Bot-check score the backend echoed with a rejection, if any.
    #[must_use]
    pub fn attestation_score(&self) -> Option<f64> {
        match self {
            Self::Exchange { payload, .. } => payload.get("recaptcha_score").and_then(Value::as_f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_attestation_failure(&self) -> bool {
        match self {
            Self::Attestation(_) => true,
            Self::Exchange { status, payload } => *status == 400 && attestation_error(payload).is_some(),
            _ => false,
        }
    }
}

/// Map a rejected login/registration to the message shown in the form.
///
/// First match wins: 403, 400 with a bot-check error, 401, then the body's
/// `error`, `detail`, `non_field_errors`, `username`, `password`, `email`
/// fields, then any other non-empty body, then the fallback.
#[must_use]
pub fn exchange_message(status: u16, payload: &Value) -> String {
    if status == 403 {
        return RATE_LIMITED_MESSAGE.to_owned();
    }
    if status == 400 {
        if let Some(message) = attestation_error(payload) {
            return message.to_owned();
        }
    }
    if status == 401 {
        return INVALID_CREDENTIALS_MESSAGE.to_owned();
    }
    if let Some(error) = field(payload, "error") {
        return join_messages(error);
    }
    if field(payload, "detail").is_some() {
        return INVALID_CREDENTIALS_MESSAGE.to_owned();
    }
    if let Some(messages) = FIELD_ERROR_KEYS.iter().find_map(|key| field(payload, key)) {
        return join_messages(messages);
    }
    match payload {
        Value::String(text) if !text.is_empty() => text.clone(),
        Value::Object(map) if !map.is_empty() => {
            let flattened = map.values().map(join_messages).filter(|s| !s.is_empty()).collect::<Vec<_>>();
            if flattened.is_empty() {
                FALLBACK_MESSAGE.to_owned()
            } else {
                flattened.join(" ")
            }
        }
        _ => FALLBACK_MESSAGE.to_owned(),
    }
}

/// The `error` string of a bot-check rejection.
fn attestation_error(payload: &Value) -> Option<&str> {
    let error = payload.get("error").and_then(Value::as_str).filter(|s| !s.is_empty())?;
    let mentions_provider = error.to_ascii_lowercase().contains("recaptcha");
    let carries_score = payload.get("recaptcha_score").is_some();
    (mentions_provider || carries_score).then_some(error)
}

fn field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| is_present(v))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Render a message field: strings verbatim, arrays space-joined one level
/// deep, anything else as JSON.
fn join_messages(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
