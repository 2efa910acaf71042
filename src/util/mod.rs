//! Session teardown and page navigation helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the one logout routine every path shares plus the guard that
//! sends anonymous visitors to the login route. `navigation` is the seam for
//! full-page loads, which the auth flows need so the next page starts from
//! whatever is in storage.

pub mod auth;
pub mod navigation;
