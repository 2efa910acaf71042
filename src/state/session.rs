//! Persisted session tokens shared by every auth component.
//!
//! SYSTEM CONTEXT
//! ==============
//! The credential submitter writes a session, the refresh coordinator swaps
//! the access token, and the verifier, coordinator and navbar clear it. Every
//! other component only reads the access token to attach it to requests.
//!
//! INVARIANTS
//! ==========
//! A session is all three keys or nothing. `read` treats any partial key set
//! as absent, and writes that fail halfway roll back. Each `clear` bumps a
//! page-lifetime logout epoch so writers that started before a logout can
//! detect that their result is stale.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";
pub const USERNAME_KEY: &str = "username";

/// Every key a session occupies, in write order.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_KEY, REFRESH_KEY, USERNAME_KEY];

/// Tokens and display name for the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub display_name: String,
}

impl Session {
    /// Assemble a session from raw stored values. Returns `None` unless all
    /// three are present and non-empty.
    pub fn from_parts(access: Option<String>, refresh: Option<String>, display_name: Option<String>) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Self {
            access_token: present(access)?,
            refresh_token: present(refresh)?,
            display_name: present(display_name)?,
        })
    }

    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (ACCESS_KEY, self.access_token.as_str()),
            (REFRESH_KEY, self.refresh_token.as_str()),
            (USERNAME_KEY, self.display_name.as_str()),
        ]
    }
}

/// Storage for the current session.
pub trait SessionStore {
    fn read(&self) -> Option<Session>;

    fn write(&self, session: &Session);

    /// Remove all session keys and advance the logout epoch.
    fn clear(&self);

    /// Overwrite the access token of a present session. Does nothing when no
    /// session is stored.
    fn replace_access(&self, access_token: &str);

    /// Number of `clear` calls observed during this page lifetime.
    fn epoch(&self) -> u64;

    fn access_token(&self) -> Option<String> {
        self.read().map(|s| s.access_token)
    }

    /// Write `session` only if no logout happened since `epoch` was read.
    fn write_if_current(&self, session: &Session, epoch: u64) -> bool {
        if self.epoch() != epoch {
            leptos::logging::warn!("session: dropping write started before logout");
            return false;
        }
        self.write(session);
        true
    }

    /// Replace the access token only if no logout happened since `epoch`.
    fn replace_access_if_current(&self, access_token: &str, epoch: u64) -> bool {
        if self.epoch() != epoch {
            leptos::logging::warn!("session: dropping refreshed token after logout");
            return false;
        }
        self.replace_access(access_token);
        true
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    epoch: u64,
}

/// Key/value store with the same layout as the browser store, kept in memory.
///
/// Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        store.write(session);
        store
    }

    /// Keys currently set, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn set_raw(&self, key: &str, value: &str) {
        self.inner.borrow_mut().entries.insert(key.to_owned(), value.to_owned());
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<Session> {
        let state = self.inner.borrow();
        let get = |key: &str| state.entries.get(key).cloned();
        Session::from_parts(get(ACCESS_KEY), get(REFRESH_KEY), get(USERNAME_KEY))
    }

    fn write(&self, session: &Session) {
        let mut state = self.inner.borrow_mut();
        for (key, value) in session.entries() {
            state.entries.insert(key.to_owned(), value.to_owned());
        }
    }

    fn clear(&self) {
        let mut state = self.inner.borrow_mut();
        for key in SESSION_KEYS {
            state.entries.remove(key);
        }
        state.epoch += 1;
    }

    fn replace_access(&self, access_token: &str) {
        if self.read().is_none() {
            return;
        }
        self.inner
            .borrow_mut()
            .entries
            .insert(ACCESS_KEY.to_owned(), access_token.to_owned());
    }

    fn epoch(&self) -> u64 {
        self.inner.borrow().epoch
    }
}

// =============================================================================
// BROWSER
// =============================================================================

thread_local! {
    static BROWSER_EPOCH: Cell<u64> = const { Cell::new(0) };
}

/// `localStorage`-backed store. Every instance addresses the same storage.
///
/// Outside the browser it behaves as an always-empty store.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn remove_all(storage: &web_sys::Storage) {
    for key in SESSION_KEYS {
        let _ = storage.remove_item(key);
    }
}

impl SessionStore for BrowserSessionStore {
    fn read(&self) -> Option<Session> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage()?;
            let get = |key: &str| storage.get_item(key).ok().flatten();
            Session::from_parts(get(ACCESS_KEY), get(REFRESH_KEY), get(USERNAME_KEY))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn write(&self, session: &Session) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                leptos::logging::warn!("session: localStorage unavailable, session not persisted");
                return;
            };
            for (key, value) in session.entries() {
                if storage.set_item(key, value).is_err() {
                    leptos::logging::error!("session: failed to persist {key}, rolling back");
                    remove_all(&storage);
                    return;
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                remove_all(&storage);
            }
        }
        BROWSER_EPOCH.with(|epoch| epoch.set(epoch.get() + 1));
    }

    fn replace_access(&self, access_token: &str) {
        #[cfg(feature = "hydrate")]
        {
            if self.read().is_none() {
                return;
            }
            if let Some(storage) = local_storage() {
                if storage.set_item(ACCESS_KEY, access_token).is_err() {
                    leptos::logging::error!("session: failed to store refreshed access token");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = access_token;
        }
    }

    fn epoch(&self) -> u64 {
        BROWSER_EPOCH.with(Cell::get)
    }
}
