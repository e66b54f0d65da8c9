//! Category API handlers.
//!
//! Viewers list active categories; staff read everything; admins write.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{ApiResponse, AppJson};
use crate::db::models::{Category, CategoryRequest};
use crate::error::AppResult;
use crate::services::CategoryService;

/// Query parameters for the admin category listing.
#[derive(Debug, Deserialize, Default)]
pub struct AdminListQuery {
    /// Include inactive categories (default: true)
    pub include_inactive: Option<bool>,
}

/// List active categories.
///
/// `GET /api/categories`
pub async fn list_public(
    State(service): State<CategoryService>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = service.list(true).await?;
    Ok(ApiResponse::ok(categories))
}

/// List categories for staff.
///
/// `GET /api/admin/categories`
pub async fn list(
    State(service): State<CategoryService>,
    Query(query): Query<AdminListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let active_only = !query.include_inactive.unwrap_or(true);
    let categories = service.list(active_only).await?;
    Ok(ApiResponse::ok(categories))
}

/// Create a category.
///
/// `POST /api/admin/categories`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "True Crime",
///   "slug": "true-crime",
///   "description": "Documentaries and series"
/// }
/// ```
pub async fn create(
    State(service): State<CategoryService>,
    AppJson(request): AppJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = service.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(category)))
}

/// Get a category by ID.
///
/// `GET /api/admin/categories/{id}`
pub async fn get(
    State(service): State<CategoryService>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = service.get(&id).await?;
    Ok(ApiResponse::ok(category))
}

/// Replace a category.
///
/// `PUT /api/admin/categories/{id}`
pub async fn update(
    State(service): State<CategoryService>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = service.update(&id, request).await?;
    Ok(ApiResponse::ok(category))
}

/// Delete a category.
///
/// `DELETE /api/admin/categories/{id}`
pub async fn delete(
    State(service): State<CategoryService>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let id = service.delete(&id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Category deleted successfully",
        "id": id
    })))
}
