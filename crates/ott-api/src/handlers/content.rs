//! Content catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::auth::RequestContext;
use crate::db::models::{ContentSummary, Plan};
use crate::error::AppResult;
use crate::services::ContentService;

/// Plan that unlocks `/api/content/exclusive`.
pub const EXCLUSIVE_PLAN: Plan = Plan::Pro;

/// Query parameters for listing content.
#[derive(Debug, Deserialize, Default)]
pub struct ListContentQuery {
    /// Restrict to one category
    pub category: Option<String>,
}

/// List published titles.
///
/// `GET /api/content`
///
/// Works anonymously; a resolved viewer also gets `playable` per title.
pub async fn list(
    State(service): State<ContentService>,
    ctx: RequestContext,
    Query(query): Query<ListContentQuery>,
) -> AppResult<Json<ApiResponse<Vec<ContentSummary>>>> {
    let items = service.list(&ctx, query.category.as_deref()).await?;
    Ok(ApiResponse::ok(items))
}

/// List titles reserved for the exclusive plan.
///
/// `GET /api/content/exclusive`
pub async fn exclusive(
    State(service): State<ContentService>,
    ctx: RequestContext,
) -> AppResult<Json<ApiResponse<Vec<ContentSummary>>>> {
    let items = service.list_exclusive(&ctx, EXCLUSIVE_PLAN).await?;
    Ok(ApiResponse::ok(items))
}

/// Resolve the stream of a title for a subscriber.
///
/// `GET /api/content/{id}/play`
///
/// The route policy checks the subscription; the title's own plan
/// requirement is checked here.
pub async fn play(
    State(service): State<ContentService>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let response = match service.playback(&ctx, &id).await? {
        Ok(playback) => ApiResponse::ok(playback).into_response(),
        Err(denial) => denial.into_response(),
    };
    Ok(response)
}
