//! Offline inspection of bearer tokens.
//!
//! Tokens are JWT-shaped (`header.payload.signature`). Only the payload is
//! read, and the signature is never checked: the backend stays the final
//! arbiter. Local inspection answers one question, "is this token worth
//! keeping?", by looking at the `exp` claim.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

/// Base64url with optional padding. Some issuers pad the payload segment.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How to treat a token whose payload carries no `exp` claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Keep the token; the backend rejects it later if it is stale.
    #[default]
    AllowMissing,
    /// Discard the token as if it had expired.
    RequireExp,
}

/// Reason a stored token was judged unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenInvalid {
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("token expired at {exp}")]
    Expired { exp: f64 },
    #[error("token has no exp claim")]
    MissingExpiry,
}

/// Decoded payload claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch. Fractional values are kept as-is.
    pub exp: Option<f64>,
    pub raw: Map<String, Value>,
}

/// Decode the payload segment of `token` into its claims.
///
/// # Errors
///
/// Returns [`TokenInvalid::Malformed`] if the token has no payload segment,
/// the segment is not base64url, the bytes are not a JSON object, or `exp`
/// is present but not a number.
pub fn decode_claims(token: &str) -> Result<Claims, TokenInvalid> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| TokenInvalid::Malformed("missing payload segment".to_owned()))?;

    let bytes = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|e| TokenInvalid::Malformed(format!("payload is not base64url: {e}")))?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| TokenInvalid::Malformed(format!("payload is not JSON: {e}")))?;
    let Value::Object(raw) = value else {
        return Err(TokenInvalid::Malformed("payload is not a JSON object".to_owned()));
    };

    let exp = match raw.get("exp") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            return Err(TokenInvalid::Malformed(format!("exp is not a number: {other}")));
        }
    };

    Ok(Claims { exp, raw })
}

/// Check whether `token` is usable at `now_secs`.
///
/// A token is valid iff it decodes and `exp > now_secs`. A missing `exp` is
/// resolved by `policy`.
///
/// # Errors
///
/// Returns the [`TokenInvalid`] reason when the token should be discarded.
pub fn check(token: &str, now_secs: f64, policy: ExpiryPolicy) -> Result<Claims, TokenInvalid> {
    let claims = decode_claims(token)?;
    match (claims.exp, policy) {
        (Some(exp), _) if exp > now_secs => Ok(claims),
        (Some(exp), _) => Err(TokenInvalid::Expired { exp }),
        (None, ExpiryPolicy::AllowMissing) => Ok(claims),
        (None, ExpiryPolicy::RequireExp) => Err(TokenInvalid::MissingExpiry),
    }
}

/// Current wall-clock time in seconds since the Unix epoch.
#[must_use]
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
