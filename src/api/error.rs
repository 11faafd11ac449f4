//! Uniform failure contract for every backend call.

/// Message used when a failed response carries no readable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "API request failed";

/// Errors produced by [`super::ApiClient`].
///
/// Every resource and verb fails with this same shape, so callers can show
/// `to_string()` next to the action that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response arrived (connection refused, DNS, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// A success response body was not JSON or was cut off, or a request body failed to encode.
    #[error("JSON body handling failed: {0}")]
    Decode(String),

    /// A header value (caller-supplied or the bearer token) is not valid ASCII.
    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// HTTP status for backend rejections, `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if the backend rejected the credentials or token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Pull a human-readable message out of a failed response body.
///
/// Checks `message`, then `msg`. Empty strings are skipped.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "msg"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .find(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
