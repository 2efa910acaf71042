//! Authenticated requests with silent refresh-on-401.
//!
//! [`AuthorizedClient`] decorates an [`HttpClient`]: it attaches the stored
//! access token, and when the backend answers 401 it refreshes the token once
//! and replays the request once. If the refresh fails, or the replay is
//! rejected again, the session is cleared and the page leaves for the login
//! route.
//!
//! STATE MACHINE
//! =============
//! `Idle -> AwaitingRefresh -> Replaying -> Idle`, with `LoggedOut` terminal
//! for the page lifetime. Each original request carries its own attempt
//! counter capped at one refresh, so a persistently invalid session can never
//! loop.
//!
//! CONCURRENCY
//! ===========
//! Refreshes are single-flight. Requests that hit 401 while a refresh is in
//! flight await the same shared future instead of starting their own. A
//! request whose 401 arrives after someone else already rotated the token
//! replays with the current token without refreshing.

#[cfg(test)]
#[path = "authorized_test.rs"]
mod authorized_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use super::api::{self, ApiError};
use super::http::{HttpClient, HttpRequest, HttpResponse, TransportError};
use crate::config::LOGIN_ROUTE;
use crate::state::session::SessionStore;
use crate::util::auth::end_session;
use crate::util::navigation::Navigator;

/// Refreshes allowed per original request.
pub const MAX_REFRESH_ATTEMPTS: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPhase {
    #[default]
    Idle,
    AwaitingRefresh,
    Replaying,
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizedError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session could not be renewed and has been cleared.
    #[error("session expired")]
    SessionExpired,
}

/// Why a shared refresh gave up. Cloned to every request awaiting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    MissingRefreshToken,
    Rejected(u16),
    Transport(String),
    Malformed(String),
    /// A logout happened while the refresh was in flight.
    Stale,
}

impl From<ApiError> for RefreshFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, .. } => Self::Rejected(status),
            ApiError::Transport(e) => Self::Transport(e.to_string()),
            other => Self::Malformed(other.to_string()),
        }
    }
}

type SharedRefresh = Shared<LocalBoxFuture<'static, Result<String, RefreshFailure>>>;

#[derive(Default)]
struct Coordinator {
    phase: Cell<RefreshPhase>,
    generation: Cell<u64>,
    in_flight: RefCell<Option<(u64, SharedRefresh)>>,
}

/// Decorator adding bearer auth and refresh-on-401 to an [`HttpClient`].
///
/// Clones share one coordinator, so all clones within a page take part in the
/// same single-flight refresh.
#[derive(Clone)]
pub struct AuthorizedClient<C, S, N> {
    inner: C,
    store: S,
    navigator: N,
    coordinator: Rc<Coordinator>,
}

impl<C, S, N> AuthorizedClient<C, S, N>
where
    C: HttpClient + Clone + 'static,
    S: SessionStore + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    pub fn new(inner: C, store: S, navigator: N) -> Self {
        Self { inner, store, navigator, coordinator: Rc::new(Coordinator::default()) }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.coordinator.phase.get()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Send `request` with the stored access token.
    ///
    /// Non-401 responses, including other error statuses, are returned as-is.
    ///
    /// # Errors
    ///
    /// [`AuthorizedError::Transport`] when no response arrived, and
    /// [`AuthorizedError::SessionExpired`] once the session had to be dropped.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, AuthorizedError> {
        let mut token = self.store.access_token();
        let mut attempts = 0u8;
        loop {
            match self.inner.send(request.clone().with_bearer(token.clone())).await {
                Ok(resp) if resp.is_unauthorized() => {}
                other => {
                    self.settle();
                    return other.map_err(AuthorizedError::from);
                }
            }

            if self.phase() == RefreshPhase::LoggedOut {
                return Err(AuthorizedError::SessionExpired);
            }
            if attempts >= MAX_REFRESH_ATTEMPTS {
                leptos::logging::warn!("auth: {} still unauthorized after refresh", request.path);
                self.expire();
                return Err(AuthorizedError::SessionExpired);
            }
            attempts += 1;

            let current = self.store.access_token();
            token = if current.is_some() && current != token {
                current
            } else {
                match self.refresh().await {
                    Ok(access) => Some(access),
                    Err(failure) => {
                        leptos::logging::warn!("auth: refresh failed: {failure:?}");
                        return Err(AuthorizedError::SessionExpired);
                    }
                }
            };
            if self.phase() != RefreshPhase::LoggedOut {
                self.coordinator.phase.set(RefreshPhase::Replaying);
            }
        }
    }

    /// Join the in-flight refresh, or start one.
    async fn refresh(&self) -> Result<String, RefreshFailure> {
        let (generation, shared) = {
            let mut slot = self.coordinator.in_flight.borrow_mut();
            if let Some((generation, shared)) = slot.as_ref() {
                (*generation, shared.clone())
            } else {
                let generation = self.coordinator.generation.get() + 1;
                self.coordinator.generation.set(generation);
                let shared = self.start_refresh().shared();
                *slot = Some((generation, shared.clone()));
                self.coordinator.phase.set(RefreshPhase::AwaitingRefresh);
                (generation, shared)
            }
        };

        let result = shared.await;

        let mut slot = self.coordinator.in_flight.borrow_mut();
        if slot.as_ref().is_some_and(|(current, _)| *current == generation) {
            *slot = None;
        }
        result
    }

    fn start_refresh(&self) -> LocalBoxFuture<'static, Result<String, RefreshFailure>> {
        let inner = self.inner.clone();
        let store = self.store.clone();
        let navigator = self.navigator.clone();
        let coordinator = Rc::clone(&self.coordinator);
        async move {
            let epoch = store.epoch();
            let result = match store.read() {
                Some(session) => api::refresh_access_token(&inner, &session.refresh_token)
                    .await
                    .map_err(RefreshFailure::from),
                None => Err(RefreshFailure::MissingRefreshToken),
            };
            match result {
                Ok(access) if store.replace_access_if_current(&access, epoch) => Ok(access),
                // Logged out elsewhere while refreshing; that logout already navigated.
                Ok(_) => {
                    coordinator.phase.set(RefreshPhase::LoggedOut);
                    Err(RefreshFailure::Stale)
                }
                Err(failure) => {
                    expire(&coordinator, &store, &navigator);
                    Err(failure)
                }
            }
        }
        .boxed_local()
    }

    fn expire(&self) {
        expire(&self.coordinator, &self.store, &self.navigator);
    }

    fn settle(&self) {
        let phase = self.phase();
        if phase == RefreshPhase::Replaying && self.coordinator.in_flight.borrow().is_none() {
            self.coordinator.phase.set(RefreshPhase::Idle);
        }
    }
}

/// Enter `LoggedOut`: clear the session and leave for the login route once.
fn expire<S, N>(coordinator: &Coordinator, store: &S, navigator: &N)
where
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    if coordinator.phase.replace(RefreshPhase::LoggedOut) == RefreshPhase::LoggedOut {
        return;
    }
    end_session(store, navigator, LOGIN_ROUTE);
}
