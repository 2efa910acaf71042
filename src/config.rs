//! Client configuration baked in at build time.
//!
//! The WASM bundle has no process environment at runtime, so values come from
//! `option_env!` during compilation and fall back to the local development
//! defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_RECAPTCHA_SITE_KEY: &str = "6LdzEDArAAAAABffNXSSMuqo20I3VW6S3m-EQvaJ";

/// Landing route; the verifier sends rejected sessions here.
pub const HOME_ROUTE: &str = "/";
/// Route the refresh coordinator sends expired sessions to.
pub const LOGIN_ROUTE: &str = "/login";
pub const PROFILE_ROUTE: &str = "/profile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API root, always ending in `/`.
    pub api_base_url: String,
    /// reCAPTCHA v3 site key used for every attestation request.
    pub recaptcha_site_key: String,
}

impl ClientConfig {
    /// Build config from compile-time environment.
    ///
    /// Optional:
    /// - `CEPU_API_URL`: backend API root, default `http://localhost:8000/api/`
    /// - `CEPU_RECAPTCHA_SITE_KEY`: reCAPTCHA v3 site key
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_parts(option_env!("CEPU_API_URL"), option_env!("CEPU_RECAPTCHA_SITE_KEY"))
    }

    fn from_parts(api_base_url: Option<&str>, site_key: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        let recaptcha_site_key = site_key
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_RECAPTCHA_SITE_KEY)
            .to_owned();
        Self { api_base_url: normalize_base_url(api_base_url), recaptcha_site_key }
    }

    /// Join an endpoint path such as `token/refresh/` onto the API root.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Script URL that loads the reCAPTCHA v3 client for this site key.
    #[must_use]
    pub fn recaptcha_script_url(&self) -> String {
        format!("https://www.google.com/recaptcha/api.js?render={}", self.recaptcha_site_key)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim_end_matches('/'))
}
