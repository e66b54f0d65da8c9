//! Account introspection and token refresh handlers.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiResponse;
use crate::auth::CurrentAccount;
use crate::db::models::Account;
use crate::error::AppResult;
use crate::state::AppState;

/// Freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Return the caller's account.
///
/// `GET /api/auth/me`
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<ApiResponse<Account>> {
    ApiResponse::ok(account)
}

/// Issue a new token for the caller.
///
/// `POST /api/auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let (token, claims) = state.issuer.issue(&account.id.to_string())?;

    tracing::info!(account_id = %account.id, "Token refreshed");

    Ok(ApiResponse::ok(TokenResponse {
        token,
        token_type: "Bearer",
        expires_at: claims.expires_at(),
    }))
}
