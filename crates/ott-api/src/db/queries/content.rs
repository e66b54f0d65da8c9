//! Content database queries.

use uuid::Uuid;

use crate::db::models::{Content, ContentRow};
use crate::db::DbPool;
use crate::error::AppResult;

/// List published titles, newest first.
///
/// When `plans` is given, only titles requiring one of those plans are returned.
pub async fn list_published_content(
    pool: &DbPool,
    category_id: Option<Uuid>,
    plans: Option<&[String]>,
) -> AppResult<Vec<Content>> {
    let rows = sqlx::query_as::<_, ContentRow>(
        r#"
        SELECT id, title, description, category_id, required_plan, stream_path, created_at
        FROM content
        WHERE is_published
          AND ($1::uuid IS NULL OR category_id = $1)
          AND ($2::text[] IS NULL OR required_plan = ANY($2))
        ORDER BY created_at DESC
        "#,
    )
    .bind(category_id)
    .bind(plans)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Content::try_from).collect()
}

/// Get a published title by ID.
pub async fn get_published_content_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Content>> {
    let row = sqlx::query_as::<_, ContentRow>(
        r#"
        SELECT id, title, description, category_id, required_plan, stream_path, created_at
        FROM content
        WHERE id = $1 AND is_published
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Content::try_from).transpose()
}
