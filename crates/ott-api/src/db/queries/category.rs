//! Category database queries.

use uuid::Uuid;

use crate::db::models::{Category, CategoryInput};
use crate::db::DbPool;
use crate::error::AppResult;

/// Insert a new category.
pub async fn insert_category(pool: &DbPool, input: &CategoryInput) -> AppResult<Category> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, slug, description, is_active)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, slug, description, is_active, created_at, updated_at
        "#,
    )
    .bind(&input.name)
    .bind(&input.slug)
    .bind(input.description.as_deref())
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Replace an existing category. Returns `None` when no row matched.
pub async fn update_category(
    pool: &DbPool,
    id: Uuid,
    input: &CategoryInput,
) -> AppResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = $2, slug = $3, description = $4, is_active = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, slug, description, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.slug)
    .bind(input.description.as_deref())
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Get a category by ID.
pub async fn get_category_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, description, is_active, created_at, updated_at
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// List categories, optionally only the active ones.
pub async fn list_categories(pool: &DbPool, active_only: bool) -> AppResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, description, is_active, created_at, updated_at
        FROM categories
        WHERE is_active OR NOT $1
        ORDER BY name ASC
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Delete a category by ID.
pub async fn delete_category_by_id(pool: &DbPool, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
