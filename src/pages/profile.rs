//! Signed-in user's profile, loaded through the refresh-aware client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded route: redirects to `/login` once verification finished without a
//! user. The profile request goes through the page's shared authorized
//! client, so an expired access token is refreshed transparently.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::UserProfile;
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;

/// Message for a failed profile load. `None` when the session expired, since
/// the page is already leaving for the login route.
#[cfg(any(test, feature = "hydrate"))]
fn load_error_message(err: &crate::net::api::ApiError) -> Option<String> {
    use crate::net::api::ApiError;

    match err {
        ApiError::SessionExpired => None,
        ApiError::Status { status: 404, .. } => Some("Profile not found.".to_owned()),
        _ => Some("Could not load your profile. Please try again.".to_owned()),
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    let profile = RwSignal::new(None::<UserProfile>);
    let error = RwSignal::new(None::<String>);
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get_untracked() || !auth.get().authenticated {
            return;
        }
        requested.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_profile(&crate::services::browser_client()).await {
                Ok(loaded) => profile.set(Some(loaded)),
                Err(e) => {
                    leptos::logging::warn!("profile: load failed: {e}");
                    error.set(load_error_message(&e));
                }
            }
        });
    });

    view! {
        <section class="profile-page">
            <h1>"Your profile"</h1>
            <Show when=move || error.get().is_some()>
                <p class="profile-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                profile
                    .get()
                    .map(|p| {
                        view! {
                            <dl class="profile-page__details">
                                <dt>"Name"</dt>
                                <dd>{p.display_name()}</dd>
                                <dt>"Username"</dt>
                                <dd>{p.username.clone()}</dd>
                                <dt>"Email"</dt>
                                <dd>{p.email.clone()}</dd>
                            </dl>
                            {p.avatar.map(|src| view! { <img class="profile-page__avatar" src=src alt="Avatar"/> })}
                        }
                    })
            }}
        </section>
    }
}
