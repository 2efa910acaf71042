//! Load-time check of a stored access token.
//!
//! Runs once when the app starts. The result only decides what the navbar
//! shows; authenticated requests are still guarded by the refresh
//! coordinator, so an advisory "valid" here is never trusted for access.

#[cfg(test)]
#[path = "verifier_test.rs"]
mod verifier_test;

use super::error::AuthError;
use crate::config::HOME_ROUTE;
use crate::net::api;
use crate::net::http::HttpClient;
use crate::state::session::SessionStore;
use crate::util::auth::end_session;
use crate::util::navigation::Navigator;

/// Outcome of [`SessionVerifier::verify_on_load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
    /// No stored session; nothing was sent.
    Anonymous,
    Authenticated { display_name: String },
    /// The stored token was rejected and the session has been cleared.
    LoggedOut,
}

pub struct SessionVerifier<C, S, N> {
    http: C,
    store: S,
    navigator: N,
}

impl<C, S, N> SessionVerifier<C, S, N>
where
    C: HttpClient,
    S: SessionStore,
    N: Navigator,
{
    pub fn new(http: C, store: S, navigator: N) -> Self {
        Self { http, store, navigator }
    }

    /// Validate the stored access token against `token/verify/`.
    ///
    /// Any failure, including a network error, ends the session and leaves
    /// for the home route.
    pub async fn verify_on_load(&self) -> Verification {
        let Some(session) = self.store.read() else {
            return Verification::Anonymous;
        };

        match self.check(&session.access_token).await {
            Ok(()) => {
                leptos::logging::log!("auth: stored session verified for {}", session.display_name);
                Verification::Authenticated { display_name: session.display_name }
            }
            Err(e) => {
                leptos::logging::warn!("auth: {e}");
                end_session(&self.store, &self.navigator, HOME_ROUTE);
                Verification::LoggedOut
            }
        }
    }

    async fn check(&self, token: &str) -> Result<(), AuthError> {
        api::verify_token(&self.http, token).await.map_err(|e| {
            leptos::logging::warn!("auth: token verify failed: {e}");
            AuthError::Verification
        })
    }
}
