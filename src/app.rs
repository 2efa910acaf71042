//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::navbar::Navbar;
use crate::pages::{home::HomePage, login::LoginPage, profile::ProfilePage};
use crate::state::auth::AuthState;

/// HTML document the `ssr` server renders around [`App`] for hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth state context and verifies any stored session once per
/// page load before the navbar and guarded routes settle.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::pending());
    provide_context(auth);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let outcome = crate::services::session_verifier().verify_on_load().await;
        auth.update(|state| state.apply_verification(&outcome));
    });

    view! {
        <Title text="StreamingCepu"/>

        <Router>
            <Navbar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("profile") view=ProfilePage/>
                </Routes>
            </main>
        </Router>
    }
}
