//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates auth flows to the
//! `auth` and `net` modules.

pub mod home;
pub mod login;
pub mod profile;
