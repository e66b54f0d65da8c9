//! Application state for the OTT API server.
//!
//! This module defines the shared application state that is
//! passed to handlers and middleware via Axum's state management.

use crate::auth::{AccountStore, PgAccountStore, TokenIssuer, TokenVerifier};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use std::sync::Arc;

/// Shared application state.
///
/// Everything here is immutable after construction; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Bearer token verifier
    pub verifier: Arc<TokenVerifier>,

    /// Bearer token issuer
    pub issuer: Arc<TokenIssuer>,

    /// Account lookup used by the authentication middleware
    pub accounts: Arc<dyn AccountStore>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state backed by PostgreSQL accounts.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no signing secret is available.
    pub fn new(db: DbPool, config: AppConfig) -> AppResult<Self> {
        let accounts = Arc::new(PgAccountStore::new(db.clone()));
        Self::with_account_store(db, config, accounts)
    }

    /// Create a new application state with a custom account store.
    pub fn with_account_store(
        db: DbPool,
        config: AppConfig,
        accounts: Arc<dyn AccountStore>,
    ) -> AppResult<Self> {
        let secret = config.jwt_secret().map_err(AppError::Config)?;
        let verifier = TokenVerifier::new(secret);
        let issuer = TokenIssuer::new(secret, config.jwt_expires_in);

        Ok(Self {
            db,
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            issuer: Arc::new(issuer),
            accounts,
            start_time: std::time::Instant::now(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
