//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::session::token::ExpiryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const TOKEN_SLOT_NAME: &str = "admin_token";
const APP_DIR_NAME: &str = "academy-admin";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A boolean env var held something other than a recognised flag value.
    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: &'static str, value: String },

    /// `ADMIN_API_URL` is not an absolute http(s) URL.
    #[error("invalid ADMIN_API_URL {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub token_path: PathBuf,
    pub expiry_policy: ExpiryPolicy,
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_URL`: backend base URL, default `http://localhost:5000`
    /// - `ADMIN_TOKEN_PATH`: token file, default `<config_dir>/academy-admin/admin_token`
    /// - `ADMIN_REQUIRE_TOKEN_EXP`: reject tokens without an `exp` claim, default off
    ///
    /// # Errors
    ///
    /// Returns an error if `ADMIN_API_URL` is not an absolute http(s) URL or
    /// `ADMIN_REQUIRE_TOKEN_EXP` is not a boolean flag.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = validated_base_url(
            &std::env::var("ADMIN_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned()),
        )?;
        let token_path = std::env::var_os("ADMIN_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);
        let expiry_policy = match env_bool("ADMIN_REQUIRE_TOKEN_EXP")? {
            Some(true) => ExpiryPolicy::RequireExp,
            Some(false) | None => ExpiryPolicy::AllowMissing,
        };

        Ok(Self { api_base_url, token_path, expiry_policy })
    }

    /// Replace the backend base URL, with the same checks as `ADMIN_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not an absolute http(s) URL.
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.api_base_url = validated_base_url(raw)?;
        Ok(())
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_BASE_URL.to_owned();
    }
    trimmed.to_owned()
}

fn validated_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = normalize_base_url(raw);
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { value: url.clone(), reason };
    let parsed = reqwest::Url::parse(&url).map_err(|e| invalid(e.to_string()))?;
    // `localhost:5000` parses with scheme `localhost`.
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(url),
        "http" | "https" => Err(invalid("missing host".to_owned())),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

fn default_token_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR_NAME).join(TOKEN_SLOT_NAME),
        None => PathBuf::from(format!(".{APP_DIR_NAME}")).join(TOKEN_SLOT_NAME),
    }
}

fn env_bool(var: &'static str) -> Result<Option<bool>, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
