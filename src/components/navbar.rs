//! Top bar with the signed-in greeting, profile link, and logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered above every route. While the load-time verification is pending
//! neither the greeting nor the login link is shown.

use leptos::prelude::*;

use crate::config::{HOME_ROUTE, LOGIN_ROUTE, PROFILE_ROUTE};
use crate::state::auth::AuthState;
use crate::state::session::BrowserSessionStore;
use crate::util::auth::end_session;
use crate::util::navigation::BrowserNavigator;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    let on_logout = move |_| {
        auth.update(AuthState::sign_out);
        end_session(&BrowserSessionStore, &BrowserNavigator, HOME_ROUTE);
    };

    let anonymous = move || {
        let state = auth.get();
        !state.loading && !state.authenticated
    };

    view! {
        <nav class="navbar">
            <a href=HOME_ROUTE class="navbar__brand">
                "StreamingCepu"
            </a>
            <span class="navbar__spacer"></span>
            <Show when=move || auth.get().authenticated>
                <a href=PROFILE_ROUTE class="navbar__greeting">
                    {move || auth.get().greeting().unwrap_or_default()}
                </a>
                <button class="btn navbar__logout" on:click=on_logout title="Logout">
                    "Logout"
                </button>
            </Show>
            <Show when=anonymous>
                <a href=LOGIN_ROUTE class="btn navbar__login">
                    "Login"
                </a>
            </Show>
        </nav>
    }
}
