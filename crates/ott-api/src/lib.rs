//! OTT API Library
//!
//! Server for a streaming platform catalog, built around an access gate:
//!
//! - **Authentication**: Bearer tokens are verified and resolved to accounts
//!   before any handler runs
//! - **Access Gate**: Ordered policy stages (presence, account state, role,
//!   email verification, subscription, plan tier) stop requests with a
//!   structured denial
//! - **Catalog**: Categories and published content, with playback gated by
//!   each title's required plan
//! - **Error Normalisation**: Every failure leaves the server as a
//!   `{ "success": false, "message": ... }` envelope
//!
//! ## Modules
//!
//! - [`auth`]: Token verification, account resolution and extractors
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, models and queries
//! - [`error`]: Error types and the response normaliser
//! - [`gate`]: Access policies and the enforcing middleware
//! - [`handlers`]: HTTP route handlers
//! - [`router`]: Route table
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use ott_api::{
//!     config::{AppConfig, DatabaseConfig},
//!     db::create_pool,
//!     router::build_router,
//!     state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_config = DatabaseConfig::from_env()?;
//!     let db_pool = create_pool(&db_config).await?;
//!     let state = AppState::new(db_pool, app_config)?;
//!     let app = build_router(state);
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod result_ext;
pub mod router;
pub mod services;
pub mod state;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
