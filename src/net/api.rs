//! Typed calls to the backend auth and profile endpoints.
//!
//! Every function is generic over [`HttpClient`] so the same code runs on
//! `gloo-net` in the browser and on fakes in tests.
//!
//! ERROR HANDLING
//! ==============
//! Callers get [`ApiError`] values instead of panics. Non-2xx responses keep
//! their status and body so the auth layer can pick the right user message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::authorized::{AuthorizedClient, AuthorizedError};
use super::http::{HttpClient, HttpRequest, HttpResponse, TransportError};
use super::types::{LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, TokenPair, UserProfile, VerifyRequest};
use crate::state::session::SessionStore;
use crate::util::navigation::Navigator;

pub const TOKEN_PATH: &str = "token/";
pub const REGISTER_PATH: &str = "register/";
pub const VERIFY_PATH: &str = "token/verify/";
pub const REFRESH_PATH: &str = "token/refresh/";
pub const PROFILE_PATH: &str = "profile/";

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request failed: {status}")]
    Status { status: u16, body: Value },

    #[error("request body encode failed: {0}")]
    Encode(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    /// The refresh coordinator gave up and logged the user out.
    #[error("session expired")]
    SessionExpired,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<AuthorizedError> for ApiError {
    fn from(err: AuthorizedError) -> Self {
        match err {
            AuthorizedError::Transport(e) => Self::Transport(e),
            AuthorizedError::SessionExpired => Self::SessionExpired,
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Turn a response into `T`, or a status error for non-2xx.
///
/// # Errors
///
/// [`ApiError::Status`] for non-2xx responses, [`ApiError::Decode`] when a
/// 2xx body does not match `T`.
pub fn decode<T: DeserializeOwned>(resp: HttpResponse) -> Result<T, ApiError> {
    if !resp.is_success() {
        return Err(ApiError::Status { status: resp.status, body: resp.body });
    }
    serde_json::from_value(resp.body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn post_json<C, B, T>(client: &C, path: &str, body: &B) -> Result<T, ApiError>
where
    C: HttpClient + ?Sized,
    B: Serialize,
    T: DeserializeOwned,
{
    let resp = client.send(HttpRequest::post(path, encode(body)?)).await?;
    decode(resp)
}

/// Exchange username + password + attestation token via `POST token/`.
///
/// # Errors
///
/// See [`decode`]; transport failures surface as [`ApiError::Transport`].
pub async fn obtain_token_pair<C: HttpClient + ?Sized>(client: &C, request: &LoginRequest<'_>) -> Result<TokenPair, ApiError> {
    post_json(client, TOKEN_PATH, request).await
}

/// Create an account and receive its token pair via `POST register/`.
///
/// # Errors
///
/// See [`decode`]; transport failures surface as [`ApiError::Transport`].
pub async fn register_account<C: HttpClient + ?Sized>(
    client: &C,
    request: &RegisterRequest<'_>,
) -> Result<TokenPair, ApiError> {
    post_json(client, REGISTER_PATH, request).await
}

/// Check an access token via `POST token/verify/`. Any 2xx means valid.
///
/// # Errors
///
/// [`ApiError::Status`] when the backend rejects the token.
pub async fn verify_token<C: HttpClient + ?Sized>(client: &C, token: &str) -> Result<(), ApiError> {
    let resp = client.send(HttpRequest::post(VERIFY_PATH, encode(&VerifyRequest { token })?)).await?;
    if !resp.is_success() {
        return Err(ApiError::Status { status: resp.status, body: resp.body });
    }
    Ok(())
}

/// Mint a new access token via `POST token/refresh/`.
///
/// # Errors
///
/// See [`decode`]; transport failures surface as [`ApiError::Transport`].
pub async fn refresh_access_token<C: HttpClient + ?Sized>(client: &C, refresh: &str) -> Result<String, ApiError> {
    let body: RefreshResponse = post_json(client, REFRESH_PATH, &RefreshRequest { refresh }).await?;
    Ok(body.access)
}

/// Fetch the signed-in user's account from `GET profile/`.
///
/// # Errors
///
/// [`ApiError::SessionExpired`] when the coordinator had to log out, otherwise
/// see [`decode`].
pub async fn fetch_profile<C, S, N>(client: &AuthorizedClient<C, S, N>) -> Result<UserProfile, ApiError>
where
    C: HttpClient + Clone + 'static,
    S: SessionStore + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    let resp = client.execute(HttpRequest::get(PROFILE_PATH)).await?;
    decode(resp)
}
