//! Transport seam between the auth logic and the browser's HTTP stack.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side / native: [`GlooHttpClient`] reports the transport as
//! unavailable, and tests substitute their own [`HttpClient`].
//!
//! Non-2xx responses are values, not errors. Only "no response at all" is a
//! [`TransportError`], which is what lets the refresh coordinator tell a 401
//! apart from a dead network.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde_json::Value;

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request relative to the API root. Cloneable so it can be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Endpoint path such as `token/refresh/`.
    pub path: String,
    pub body: Option<Value>,
    /// Access token sent as `Authorization: Bearer ...`.
    pub bearer: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None, bearer: None }
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: Some(body), bearer: None }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; non-JSON text is kept as a string, empty as null.
    pub body: Value,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
        };
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// No response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Failed(String),
    #[error("http transport not available outside the browser")]
    Unavailable,
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// Issue one request. Resolves `Ok` for every response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] only when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser transport resolving paths against [`ClientConfig::api_base_url`].
#[derive(Debug, Clone)]
pub struct GlooHttpClient {
    config: ClientConfig,
}

impl GlooHttpClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GlooHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            let url = self.config.endpoint(&request.path);
            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Patch => Request::patch(&url),
                Method::Delete => Request::delete(&url),
            };
            if let Some(token) = &request.bearer {
                builder = builder.header("Authorization", &bearer_header(token));
            }
            let sent = match &request.body {
                Some(body) => {
                    builder
                        .json(body)
                        .map_err(|e| TransportError::Failed(e.to_string()))?
                        .send()
                        .await
                }
                None => builder.send().await,
            };
            let resp = sent.map_err(|e| {
                leptos::logging::warn!("http: {} {} failed: {e}", request.method.as_str(), request.path);
                TransportError::Failed(e.to_string())
            })?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| TransportError::Failed(e.to_string()))?;
            Ok(HttpResponse::from_text(status, &text))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(TransportError::Unavailable)
        }
    }
}
