//! Fixed-path wrappers for login and the two resource kinds.

use serde_json::Value;

use super::envelope::{Collection, unwrap_collection};
use super::{ApiClient, ApiError, ApiRequest};
use crate::credentials::Credentials;

pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Course,
    Category,
}

impl Resource {
    #[must_use]
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Course => "/admin/courses",
            Self::Category => "/admin/categories",
        }
    }

    /// Field that wraps the list when the backend does not return a bare array.
    #[must_use]
    pub fn envelope_key(self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Category => "categories",
        }
    }

    #[must_use]
    pub fn item_path(self, id: &str) -> String {
        format!("{}/{id}", self.collection_path())
    }
}

impl ApiClient {
    /// Exchange credentials for a token. Returns the raw response body.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the exchange.
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.request(ApiRequest::post(LOGIN_PATH, credentials.to_json())).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn list(&self, resource: Resource) -> Result<Collection, ApiError> {
        let body = self.request(ApiRequest::get(resource.collection_path())).await?;
        Ok(unwrap_collection(body, resource.envelope_key()))
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create(&self, resource: Resource, fields: Value) -> Result<Value, ApiError> {
        self.request(ApiRequest::post(resource.collection_path(), fields)).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn update(&self, resource: Resource, id: &str, fields: Value) -> Result<Value, ApiError> {
        self.request(ApiRequest::put(resource.item_path(id), fields)).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        self.request(ApiRequest::delete(resource.item_path(id))).await
    }

    // -------------------------------------------------------------------------
    // Per-resource shorthands
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn list_courses(&self) -> Result<Collection, ApiError> {
        self.list(Resource::Course).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create_course(&self, fields: Value) -> Result<Value, ApiError> {
        self.create(Resource::Course, fields).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn update_course(&self, id: &str, fields: Value) -> Result<Value, ApiError> {
        self.update(Resource::Course, id, fields).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn delete_course(&self, id: &str) -> Result<Value, ApiError> {
        self.delete(Resource::Course, id).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn list_categories(&self) -> Result<Collection, ApiError> {
        self.list(Resource::Category).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create_category(&self, fields: Value) -> Result<Value, ApiError> {
        self.create(Resource::Category, fields).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn update_category(&self, id: &str, fields: Value) -> Result<Value, ApiError> {
        self.update(Resource::Category, id, fields).await
    }

    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn delete_category(&self, id: &str) -> Result<Value, ApiError> {
        self.delete(Resource::Category, id).await
    }
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
