//! Summary counts for the dashboard view.

use serde::Serialize;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_courses: usize,
    pub total_categories: usize,
}

/// Fetch both collections concurrently and count them.
///
/// # Errors
///
/// Fails with the first [`ApiError`] from either listing.
pub async fn fetch_stats(api: &ApiClient) -> Result<DashboardStats, ApiError> {
    let (courses, categories) = tokio::try_join!(api.list_courses(), api.list_categories())?;
    Ok(DashboardStats { total_courses: courses.len(), total_categories: categories.len() })
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
