//! Client-side state shared across pages.
//!
//! DESIGN
//! ======
//! `session` is the persisted token store; `auth` is the reactive view of it
//! that components render from.

pub mod auth;
pub mod session;
