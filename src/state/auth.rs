//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Filled once by the load-time session verifier and read by the navbar,
//! route guards, and the login page to decide what to render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::auth::verifier::Verification;

/// Authentication state tracking the signed-in user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub display_name: Option<String>,
    pub authenticated: bool,
    /// True until the load-time verification has finished.
    pub loading: bool,
}

impl AuthState {
    /// State at page start, before the stored token has been checked.
    #[must_use]
    pub fn pending() -> Self {
        Self { loading: true, ..Self::default() }
    }

    pub fn apply_verification(&mut self, outcome: &Verification) {
        self.loading = false;
        match outcome {
            Verification::Authenticated { display_name } => {
                self.authenticated = true;
                self.display_name = Some(display_name.clone());
            }
            Verification::Anonymous | Verification::LoggedOut => self.sign_out(),
        }
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
        self.display_name = None;
    }

    /// Navbar greeting for a verified user.
    #[must_use]
    pub fn greeting(&self) -> Option<String> {
        if !self.authenticated {
            return None;
        }
        self.display_name.as_ref().map(|name| format!("Hi, {name}"))
    }
}
