//! Bot-mitigation tokens from reCAPTCHA v3.
//!
//! The provider's callback API (`grecaptcha.ready(cb)` followed by
//! `grecaptcha.execute(siteKey, { action })`) is wrapped in a single async
//! call that yields a token or a typed failure. Tokens are opaque and
//! forwarded to the backend verbatim.

#[cfg(test)]
#[path = "attestation_test.rs"]
mod attestation_test;

use super::error::AttestationError;
use crate::config::ClientConfig;

/// DOM id of the injected provider script.
pub const SCRIPT_ELEMENT_ID: &str = "recaptcha-v3-script";

/// Action name a token is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttestationAction {
    Login,
    Register,
}

impl AttestationAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

#[async_trait::async_trait(?Send)]
pub trait AttestationProvider {
    /// Obtain a fresh token scoped to `action`.
    async fn attest(&self, action: AttestationAction) -> Result<String, AttestationError>;
}

/// reCAPTCHA v3 provider using the page-global `grecaptcha` object.
#[derive(Clone, Debug)]
pub struct Recaptcha {
    site_key: String,
}

impl Recaptcha {
    pub fn new(site_key: impl Into<String>) -> Self {
        Self { site_key: site_key.into() }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.recaptcha_site_key.clone())
    }

    #[must_use]
    pub fn site_key(&self) -> &str {
        &self.site_key
    }
}

#[async_trait::async_trait(?Send)]
impl AttestationProvider for Recaptcha {
    async fn attest(&self, action: AttestationAction) -> Result<String, AttestationError> {
        #[cfg(feature = "hydrate")]
        {
            execute(&self.site_key, action).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = action;
            Err(AttestationError::Unavailable)
        }
    }
}

/// Accept a provider result only if it is a non-empty string.
#[cfg(any(test, feature = "hydrate"))]
fn token_from(value: Option<String>) -> Result<String, AttestationError> {
    value
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AttestationError::Rejected("empty token".to_owned()))
}

/// Run a callback registration. If it fails, the error goes to `reject` so the
/// promise waiting on the callback still settles.
#[cfg(any(test, feature = "hydrate"))]
fn register_or_reject<E>(register: impl FnOnce() -> Result<(), E>, reject: impl FnOnce(E)) {
    if let Err(e) = register() {
        reject(e);
    }
}

#[cfg(feature = "hydrate")]
fn describe(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(feature = "hydrate")]
async fn execute(site_key: &str, action: AttestationAction) -> Result<String, AttestationError> {
    use js_sys::{Function, Object, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let method = |target: &JsValue, name: &str| -> Option<Function> {
        Reflect::get(target, &JsValue::from_str(name)).ok()?.dyn_into::<Function>().ok()
    };

    let window = web_sys::window().ok_or(AttestationError::Unavailable)?;
    let grecaptcha =
        Reflect::get(&window, &JsValue::from_str("grecaptcha")).map_err(|_| AttestationError::Unavailable)?;
    if grecaptcha.is_undefined() || grecaptcha.is_null() {
        return Err(AttestationError::Unavailable);
    }
    let ready = method(&grecaptcha, "ready").ok_or(AttestationError::Unavailable)?;
    let run = method(&grecaptcha, "execute").ok_or(AttestationError::Unavailable)?;

    // `ready` takes a callback; hand it the promise's resolver.
    let ready_promise = Promise::new(&mut |resolve, reject| {
        register_or_reject(
            || ready.call1(&grecaptcha, &resolve).map(drop),
            |e| {
                let _ = reject.call1(&JsValue::NULL, &e);
            },
        );
    });
    JsFuture::from(ready_promise)
        .await
        .map_err(|e| AttestationError::Rejected(describe(&e)))?;

    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("action"), &JsValue::from_str(action.as_str()))
        .map_err(|e| AttestationError::Rejected(describe(&e)))?;
    let pending = run
        .call2(&grecaptcha, &JsValue::from_str(site_key), &options)
        .map_err(|e| AttestationError::Rejected(describe(&e)))?
        .dyn_into::<Promise>()
        .map_err(|_| AttestationError::Rejected("execute did not return a promise".to_owned()))?;
    let token = JsFuture::from(pending)
        .await
        .map_err(|e| AttestationError::Rejected(describe(&e)))?;

    token_from(token.as_string())
}

/// Inject the provider script once per page. Later calls are no-ops.
pub fn ensure_script_loaded(config: &ClientConfig) {
    #[cfg(feature = "hydrate")]
    {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.get_element_by_id(SCRIPT_ELEMENT_ID).is_some() {
            return;
        }
        let Ok(script) = document.create_element("script") else {
            leptos::logging::warn!("attestation: could not create script element");
            return;
        };
        let _ = script.set_attribute("id", SCRIPT_ELEMENT_ID);
        let _ = script.set_attribute("src", &config.recaptcha_script_url());
        let _ = script.set_attribute("async", "");
        let _ = script.set_attribute("defer", "");
        match document.body() {
            Some(body) if body.append_child(&script).is_ok() => {
                leptos::logging::log!("attestation: provider script injected");
            }
            _ => leptos::logging::warn!("attestation: failed to inject provider script"),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = config;
    }
}
