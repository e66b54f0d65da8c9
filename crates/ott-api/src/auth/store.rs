//! Account lookup used by the authentication middleware.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::Account;
use crate::db::queries::account as queries;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::result_ext::ResultExt;

/// Resolves a verified subject to its persisted account.
///
/// A missing account is `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// PostgreSQL-backed account store.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: DbPool,
}

impl PgAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        queries::get_account_by_id(&self.pool, id)
            .await
            .log(format!("looking up account {}", id))
    }
}
