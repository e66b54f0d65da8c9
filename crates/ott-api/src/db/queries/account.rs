//! Account database queries.

use uuid::Uuid;

use crate::db::models::{Account, AccountRow};
use crate::db::DbPool;
use crate::error::AppResult;

/// Get an account by ID.
///
/// The projection leaves out `password_hash`.
pub async fn get_account_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<Account>> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, email, name, role, is_active, is_blocked, is_email_verified,
               subscription_plan, subscription_status, created_at, updated_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Account::try_from).transpose()
}
