//! Client-side authentication flows.
//!
//! SYSTEM CONTEXT
//! ==============
//! `submitter` turns typed credentials into a persisted session, `verifier`
//! checks a stored session once per page load, and `attestation` supplies the
//! bot-mitigation tokens both exchanges require. Authenticated requests after
//! login go through `net::authorized`.

pub mod attestation;
pub mod error;
pub mod password;
pub mod submitter;
pub mod verifier;
