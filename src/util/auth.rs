//! Shared auth helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every logout path (verifier rejection, refresh failure, logout button)
//! must clear the session and leave the page the same way, and protected
//! routes apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::config::LOGIN_ROUTE;
use crate::state::auth::AuthState;
use crate::state::session::SessionStore;
use crate::util::navigation::Navigator;

/// Clear every session key, then leave for `route`.
pub fn end_session<S, N>(store: &S, navigator: &N, route: &str)
where
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    store.clear();
    leptos::logging::log!("auth: session cleared, leaving for {route}");
    navigator.navigate(route);
}

/// True once verification finished without a signed-in user.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && !state.authenticated
}

/// Redirect to the login route whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        }
    });
}
