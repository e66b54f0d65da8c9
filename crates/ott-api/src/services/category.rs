//! Category service for admin catalog management.

use uuid::Uuid;

use crate::db::models::{Category, CategoryRequest};
use crate::db::queries::category as queries;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Parse a path identifier; anything that is not a UUID names no resource.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

/// Service for category operations.
#[derive(Clone)]
pub struct CategoryService {
    pool: DbPool,
}

impl CategoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a category. Duplicate names or slugs surface as conflicts.
    pub async fn create(&self, request: CategoryRequest) -> AppResult<Category> {
        let input = request.validate()?;
        let category = queries::insert_category(&self.pool, &input).await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Replace a category.
    pub async fn update(&self, identifier: &str, request: CategoryRequest) -> AppResult<Category> {
        let id = parse_id(identifier)?;
        let input = request.validate()?;

        let category = queries::update_category(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found(identifier))?;

        tracing::info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    /// Get a category by ID.
    pub async fn get(&self, identifier: &str) -> AppResult<Category> {
        let id = parse_id(identifier)?;
        queries::get_category_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(identifier))
    }

    /// List categories; viewers only see active ones.
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Category>> {
        queries::list_categories(&self.pool, active_only).await
    }

    /// Delete a category by ID.
    pub async fn delete(&self, identifier: &str) -> AppResult<Uuid> {
        let id = parse_id(identifier)?;

        if queries::delete_category_by_id(&self.pool, id).await? {
            tracing::info!(category_id = %id, "Category deleted");
            Ok(id)
        } else {
            Err(not_found(identifier))
        }
    }
}

fn not_found(identifier: &str) -> AppError {
    AppError::NotFound(format!("Category '{}' not found", identifier))
}
