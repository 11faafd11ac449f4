//! API gateway: the only path to the backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call goes through [`ApiClient::request`]. It reads the
//! current token from the session's [`TokenStore`], attaches it, and maps
//! every failure onto [`ApiError`].
//!
//! HEADER ORDER
//! ============
//! `Content-Type: application/json` first, then caller headers (which may
//! replace it), then `Authorization: Bearer <token>` whenever the store holds
//! a token. The token is attached as-is: expiry is the backend's call here.

pub mod envelope;
pub mod error;
pub mod resources;
pub mod transport;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

pub use envelope::{Collection, unwrap_collection};
pub use error::ApiError;
pub use resources::Resource;
pub use transport::{HttpTransport, OutgoingRequest, RawResponse, ReqwestTransport, TransportError};

use crate::config::{AdminConfig, normalize_base_url};
use crate::session::store::TokenStore;
use error::{GENERIC_FAILURE_MESSAGE, extract_error_message};

const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// REQUEST ENVELOPE
// =============================================================================

/// Path, method, optional JSON body, optional extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { path: path.into(), method, body: None, headers: Vec::new() }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>, store: Arc<dyn TokenStore>) -> Self {
        Self { base_url: normalize_base_url(base_url), transport, store }
    }

    /// Build a reqwest-backed client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AdminConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(&config.api_base_url, Arc::new(transport), store))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Send `req` and return the parsed JSON body.
    ///
    /// An empty success body yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when no response arrives
    /// - [`ApiError::Status`] for non-2xx statuses
    /// - [`ApiError::Decode`] when a success body is not JSON or a body read breaks off
    /// - [`ApiError::InvalidHeader`] when the stored token is not a valid header value
    pub async fn request(&self, req: ApiRequest) -> Result<Value, ApiError> {
        let outgoing = self.build(req)?;
        tracing::debug!(method = %outgoing.method, url = %outgoing.url, "sending API request");

        let response = self.transport.send(outgoing).await.map_err(|e| {
            tracing::debug!(error = %e, "API request failed in transport");
            match e {
                TransportError::NoResponse(message) => ApiError::Network(message),
                TransportError::BodyRead { status, message } => {
                    ApiError::Decode(format!("reading HTTP {status} body failed: {message}"))
                }
            }
        })?;
        tracing::debug!(status = response.status, "API response received");

        if !(200..300).contains(&response.status) {
            let message =
                extract_error_message(&response.body).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
            return Err(ApiError::Status { status: response.status, message });
        }

        parse_success_body(&response.body)
    }

    fn build(&self, req: ApiRequest) -> Result<OutgoingRequest, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in req.headers {
            headers.insert(name, value);
        }
        if let Some(token) = self.current_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let body = req
            .body
            .map(|json| serde_json::to_vec(&json))
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(OutgoingRequest { method: req.method, url: self.url_for(&req.path), headers, body })
    }

    fn current_token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "token store unreadable; sending request without credentials");
                None
            }
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn parse_success_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
