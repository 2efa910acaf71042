//! SSR frontend server.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders [`shell`] for every client route so the `hydrate` bundle has
//! server-rendered markup to attach to, and serves that bundle from `/pkg`.
//! Only the frontend lives here; the API is a separate service reached through
//! `CEPU_API_URL`.

#[cfg(test)]
#[path = "server_test.rs"]
mod server_test;

use std::path::PathBuf;

use axum::Router;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;

use crate::app::{App, shell};

/// Paths of every client route rendered on the server.
pub fn page_paths() -> Vec<String> {
    generate_route_list(App).iter().map(|listing| listing.path().to_owned()).collect()
}

/// Leptos SSR routes plus the compiled site assets.
pub fn router(leptos_options: LeptosOptions) -> Router {
    let routes = generate_route_list(App);
    let pkg_dir = PathBuf::from(leptos_options.site_root.as_ref()).join(leptos_options.site_pkg_dir.as_ref());

    Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || shell(opts.clone())
        })
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .with_state(leptos_options)
}

/// Load the Leptos options from `Cargo.toml` and build the router.
///
/// # Errors
///
/// Returns an error if the `[package.metadata.leptos]` section is missing or
/// malformed.
pub fn app() -> Result<(Router, std::net::SocketAddr), String> {
    let conf = get_configuration(Some("Cargo.toml")).map_err(|e| format!("leptos configuration: {e}"))?;
    let addr = conf.leptos_options.site_addr;
    Ok((router(conf.leptos_options), addr))
}
