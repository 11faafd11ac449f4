//! Admin client for the academy backend: session lifecycle, authorized API
//! calls, and course/category management.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use academy_admin::{AdminConfig, ApiClient, Credentials, FileTokenStore, SessionManager};
//!
//! let config = AdminConfig::from_env()?;
//! let store = Arc::new(FileTokenStore::new(&config.token_path));
//! let api = ApiClient::from_config(&config, store)?;
//! let session = SessionManager::new(api, config.expiry_policy);
//!
//! session.initialize();
//! session.login(&Credentials::new("a@b.com", "secret1")).await?;
//! let courses = session.api().list_courses().await?;
//! println!("{} courses", courses.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod session;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError, ApiRequest, Collection, Resource};
pub use config::{AdminConfig, ConfigError};
pub use credentials::{Credentials, ValidationError};
pub use dashboard::{DashboardStats, fetch_stats};
pub use session::store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
pub use session::token::ExpiryPolicy;
pub use session::{AuthState, GuardDecision, SessionError, SessionManager};
