use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::RequestContext;
use crate::error::AppResult;
use crate::state::AppState;

/// Resolve the caller and inject a [`RequestContext`] into request extensions.
///
/// Never denies by itself: missing, invalid and expired credentials are
/// recorded in the context for the access gate to judge. Account store
/// failures go to the error normaliser.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let ctx =
        RequestContext::resolve(request.headers(), &state.verifier, state.accounts.as_ref()).await?;

    match ctx.account() {
        Some(account) => {
            tracing::debug!(account_id = %account.id, role = %account.role, "Authenticated request")
        }
        None => tracing::debug!(credential = ?ctx.credential(), "Unauthenticated request"),
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Optional-auth variant of [`authenticate`].
///
/// Verification failures, unknown subjects and deactivated accounts proceed
/// as anonymous instead of being recorded for denial.
pub async fn optional_authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let ctx = RequestContext::resolve(request.headers(), &state.verifier, state.accounts.as_ref())
        .await?
        .or_anonymous();

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
