//! Login and registration: credentials + attestation token in, session out.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login form builds [`Credentials`] and hands them to
//! [`CredentialSubmitter::submit`]. On success the session is already
//! persisted; the caller closes the form and reloads the page so every
//! component starts from the stored tokens. The submitter never reloads.
//!
//! ORDER
//! =====
//! Local password rules (registration only), then attestation, then the
//! backend exchange. A failure at any step stops the flow, so a rejected
//! password or a missing attestation token never reaches the network.

#[cfg(test)]
#[path = "submitter_test.rs"]
mod submitter_test;

use super::attestation::{AttestationAction, AttestationProvider};
use super::error::AuthError;
use super::password::{StrengthEstimator, ZxcvbnEstimator, validate_registration};
use crate::net::api;
use crate::net::http::HttpClient;
use crate::net::types::{LoginRequest, RegisterRequest, TokenPair};
use crate::state::session::{Session, SessionStore};

/// What the user typed. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
        password_confirmation: String,
    },
}

impl Credentials {
    #[must_use]
    pub fn action(&self) -> AttestationAction {
        match self {
            Self::Login { .. } => AttestationAction::Login,
            Self::Register { .. } => AttestationAction::Register,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Login { username, .. } | Self::Register { username, .. } => username,
        }
    }
}

pub struct CredentialSubmitter<C, A, S, E = ZxcvbnEstimator> {
    http: C,
    attestation: A,
    store: S,
    estimator: E,
}

impl<C, A, S, E> CredentialSubmitter<C, A, S, E>
where
    C: HttpClient,
    A: AttestationProvider,
    S: SessionStore,
    E: StrengthEstimator,
{
    pub fn new(http: C, attestation: A, store: S, estimator: E) -> Self {
        Self { http, attestation, store, estimator }
    }

    /// Exchange `credentials` for a session and persist it.
    ///
    /// The stored display name is the submitted username. If a logout
    /// happened while the exchange was in flight, the tokens are not stored.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] and [`AuthError::Attestation`] before any
    /// backend call, [`AuthError::Exchange`] when the backend rejects the
    /// credentials, and [`AuthError::Network`] when it cannot be reached.
    pub async fn submit(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if let Credentials::Register { username, email, password, password_confirmation } = credentials {
            validate_registration(&self.estimator, password, password_confirmation, &[username.as_str(), email.as_str()])?;
        }

        let epoch = self.store.epoch();
        let action = credentials.action();
        let token = self.attestation.attest(action).await.map_err(|e| {
            leptos::logging::warn!("auth: {} attestation failed: {e}", action.as_str());
            e
        })?;

        let pair = self.exchange(credentials, &token).await.map_err(|e| {
            leptos::logging::warn!("auth: {} rejected: {e}", action.as_str());
            AuthError::from(e)
        })?;
        if let Some(score) = pair.recaptcha_score {
            leptos::logging::log!("auth: {} accepted, bot score {score}", action.as_str());
        }

        let session = Session {
            access_token: pair.access,
            refresh_token: pair.refresh,
            display_name: credentials.username().to_owned(),
        };
        self.store.write_if_current(&session, epoch);
        Ok(session)
    }

    async fn exchange(&self, credentials: &Credentials, token: &str) -> Result<TokenPair, api::ApiError> {
        match credentials {
            Credentials::Login { username, password } => {
                let request = LoginRequest { username, password, recaptcha_token: token };
                api::obtain_token_pair(&self.http, &request).await
            }
            Credentials::Register { username, email, password, password_confirmation } => {
                let request = RegisterRequest {
                    username,
                    email,
                    password,
                    password2: password_confirmation,
                    recaptcha_token: token,
                };
                api::register_account(&self.http, &request).await
            }
        }
    }
}
