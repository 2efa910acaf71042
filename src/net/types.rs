//! Wire DTOs for the auth and profile endpoints.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub recaptcha_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password2: &'a str,
    pub recaptcha_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Token pair returned by login and registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenPair {
    #[serde(deserialize_with = "non_empty")]
    pub access: String,
    #[serde(deserialize_with = "non_empty")]
    pub refresh: String,
    /// Bot-check score the backend attaches to successful exchanges.
    #[serde(default)]
    pub recaptcha_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(deserialize_with = "non_empty")]
    pub access: String,
}

/// The signed-in user's account as served by `profile/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Full name when one is set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_owned() }
    }
}

/// Tokens must carry a value; an empty one would leave a session that reads
/// as absent.
fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(serde::de::Error::custom("empty token"));
    }
    Ok(value)
}
