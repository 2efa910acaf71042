//! Network modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the transport seam, `api` holds the typed endpoint calls, `types`
//! the wire DTOs, and `authorized` wraps authenticated calls with
//! refresh-on-401.

pub mod api;
pub mod authorized;
pub mod http;
pub mod types;
