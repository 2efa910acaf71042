//! Landing page.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::config::{LOGIN_ROUTE, PROFILE_ROUTE};
use crate::state::auth::AuthState;

fn headline(state: &AuthState) -> String {
    match (&state.display_name, state.authenticated) {
        (Some(name), true) => format!("Welcome back, {name}."),
        _ if state.loading => "Checking your session...".to_owned(),
        _ => "Welcome to StreamingCepu.".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    view! {
        <section class="home-page">
            <h1>{move || headline(&auth.get())}</h1>
            <Show
                when=move || auth.get().authenticated
                fallback=move || {
                    view! {
                        <a href=LOGIN_ROUTE class="btn home-page__cta">
                            "Sign in to start watching"
                        </a>
                    }
                }
            >
                <a href=PROFILE_ROUTE class="btn home-page__cta">
                    "View your profile"
                </a>
            </Show>
        </section>
    }
}
