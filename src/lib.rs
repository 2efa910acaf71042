//! # cepu-client
//!
//! Leptos + WASM client for the StreamingCepu movie-streaming app, covering
//! authentication and the session lifecycle: login and registration with
//! reCAPTCHA attestation, password strength scoring, token persistence,
//! load-time verification of a stored session, and silent refresh-on-401 for
//! authenticated requests.
//!
//! Browser-only pieces (storage, HTTP, reCAPTCHA, navigation) sit behind
//! traits and compile to inert stubs without the `hydrate` feature, so the
//! flows run natively in unit tests against in-memory fakes. The `ssr`
//! feature adds the server that renders the shell the WASM bundle hydrates.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
#[cfg(feature = "ssr")]
pub mod server;
pub mod services;
pub mod state;
pub mod util;

#[cfg(test)]
mod testing;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
