//! Session manager: single owner of the authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads and writes the token slot, decides whether a stored token is still
//! worth using, and publishes the tri-state [`AuthState`]. Route guards and
//! the CLI read the state; nothing else mutates it.
//!
//! LIFECYCLE
//! =========
//! A new manager starts in `Loading`. [`SessionManager::initialize`] resolves
//! it from the stored token without contacting the backend. `login` and
//! `logout` are the only other transitions.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent un-awaited `login`/`logout` calls are last-write-wins on both
//! the slot and the state. Expiry uses the local clock with no skew margin.

pub mod store;
pub mod token;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::api::{ApiClient, ApiError};
use crate::credentials::Credentials;
use store::{StoreError, TokenStore};
use token::ExpiryPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// Validity check in progress; not a final answer.
    Loading,
    Authenticated { token: String },
}

impl AuthState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token } => Some(token),
            _ => None,
        }
    }
}

/// What a protected screen should do for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// State still loading; render nothing final yet.
    Wait,
    RedirectToLogin,
    Proceed { token: String },
}

impl From<&AuthState> for GuardDecision {
    fn from(state: &AuthState) -> Self {
        match state {
            AuthState::Loading => Self::Wait,
            AuthState::Unauthenticated => Self::RedirectToLogin,
            AuthState::Authenticated { token } => Self::Proceed { token: token.clone() },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("login response did not include a token")]
    MissingToken,
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    policy: ExpiryPolicy,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    /// Create a manager over the gateway's token store. State starts as `Loading`.
    #[must_use]
    pub fn new(api: ApiClient, policy: ExpiryPolicy) -> Self {
        let store = Arc::clone(api.store());
        let (state, _) = watch::channel(AuthState::Loading);
        Self { api, store, policy, state }
    }

    /// Gateway sharing this session's token slot.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Resolve the startup state from the stored token. Never fails.
    pub fn initialize(&self) -> AuthState {
        self.initialize_at(token::now_secs())
    }

    /// [`Self::initialize`] with an explicit clock reading.
    pub fn initialize_at(&self, now_secs: f64) -> AuthState {
        self.state.send_replace(AuthState::Loading);

        let next = match self.store.load() {
            Ok(None) => AuthState::Unauthenticated,
            Ok(Some(stored)) => match token::check(&stored, now_secs, self.policy) {
                Ok(_) => AuthState::Authenticated { token: stored },
                Err(reason) => {
                    tracing::debug!(%reason, "discarding stored token");
                    self.clear_slot();
                    AuthState::Unauthenticated
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "token store unreadable; starting logged out");
                AuthState::Unauthenticated
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Exchange credentials and persist the issued token.
    ///
    /// On any failure the state and the slot are left as they were.
    /// Returns the backend's login response body.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Api`] when the exchange fails
    /// - [`SessionError::MissingToken`] when the response has no string `token`
    /// - [`SessionError::Store`] when the token cannot be persisted
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, SessionError> {
        let body = self.api.login(credentials).await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?
            .to_owned();

        self.store.save(&token)?;
        self.state.send_replace(AuthState::Authenticated { token });
        tracing::info!(email = %credentials.email, "admin session established");
        Ok(body)
    }

    /// Drop the stored token and go to `Unauthenticated`. Idempotent.
    pub fn logout(&self) {
        self.clear_slot();
        self.state.send_replace(AuthState::Unauthenticated);
    }

    #[must_use]
    pub fn current_state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn guard(&self) -> GuardDecision {
        GuardDecision::from(&*self.state.borrow())
    }

    /// Receiver that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Wait until the state is no longer `Loading`.
    pub async fn wait_ready(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.current_state(),
        }
    }

    fn clear_slot(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
