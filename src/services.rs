//! Browser-wide service handles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos context values must be `Send + Sync`, but the refresh coordinator
//! shares `Rc` state, so the authorized client lives in a thread-local
//! instead. Every caller on the page gets a clone of the same client and
//! therefore joins the same single-flight refresh. Only `AuthState` goes into
//! reactive context.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use crate::auth::attestation::Recaptcha;
use crate::auth::password::ZxcvbnEstimator;
use crate::auth::submitter::CredentialSubmitter;
use crate::auth::verifier::SessionVerifier;
use crate::config::ClientConfig;
use crate::net::authorized::AuthorizedClient;
use crate::net::http::GlooHttpClient;
use crate::state::session::BrowserSessionStore;
use crate::util::navigation::BrowserNavigator;

pub type BrowserClient = AuthorizedClient<GlooHttpClient, BrowserSessionStore, BrowserNavigator>;
pub type BrowserSubmitter = CredentialSubmitter<GlooHttpClient, Recaptcha, BrowserSessionStore, ZxcvbnEstimator>;
pub type BrowserVerifier = SessionVerifier<GlooHttpClient, BrowserSessionStore, BrowserNavigator>;

thread_local! {
    static CONFIG: ClientConfig = ClientConfig::from_build_env();
    static BROWSER_CLIENT: BrowserClient =
        AuthorizedClient::new(GlooHttpClient::new(config()), BrowserSessionStore, BrowserNavigator);
}

#[must_use]
pub fn config() -> ClientConfig {
    CONFIG.with(Clone::clone)
}

/// The page's authorized client. Clones share one refresh coordinator.
#[must_use]
pub fn browser_client() -> BrowserClient {
    BROWSER_CLIENT.with(Clone::clone)
}

#[must_use]
pub fn credential_submitter() -> BrowserSubmitter {
    let config = config();
    CredentialSubmitter::new(
        GlooHttpClient::new(config.clone()),
        Recaptcha::from_config(&config),
        BrowserSessionStore,
        ZxcvbnEstimator,
    )
}

#[must_use]
pub fn session_verifier() -> BrowserVerifier {
    SessionVerifier::new(GlooHttpClient::new(config()), BrowserSessionStore, BrowserNavigator)
}
