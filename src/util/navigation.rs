//! Page-level navigation used by the session flow.
//!
//! Logout and login success leave the current page entirely (full
//! navigation / reload) rather than routing client-side, so the next page
//! starts from freshly persisted session state.

/// Full-page navigation. Implementations never block.
pub trait Navigator {
    fn navigate(&self, path: &str);

    fn reload(&self);
}

/// `window.location` navigator. No-op outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                if window.location().set_href(path).is_err() {
                    leptos::logging::warn!("navigation: failed to open {path}");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
        }
    }

    fn reload(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    }
}
