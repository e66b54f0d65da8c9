//! Content service: catalog listing and playback authorisation.

use uuid::Uuid;

use super::category::parse_id;
use crate::auth::RequestContext;
use crate::db::models::{Content, ContentSummary, Plan, PlaybackResponse};
use crate::db::queries::content as queries;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::gate::{AccessPolicy, Denial, Stage};

/// Service for content operations.
#[derive(Clone)]
pub struct ContentService {
    pool: DbPool,
}

impl ContentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List published titles, annotated with playability for a resolved viewer.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        category: Option<&str>,
    ) -> AppResult<Vec<ContentSummary>> {
        let category_id = category.map(parse_id).transpose()?;
        let items = queries::list_published_content(&self.pool, category_id, None).await?;
        Ok(annotate(ctx, items))
    }

    /// List titles reserved for the given plan and for premium.
    pub async fn list_exclusive(
        &self,
        ctx: &RequestContext,
        plan: Plan,
    ) -> AppResult<Vec<ContentSummary>> {
        let plans = vec![plan.as_str().to_string(), Plan::Premium.as_str().to_string()];
        let items =
            queries::list_published_content(&self.pool, None, Some(plans.as_slice())).await?;
        Ok(annotate(ctx, items))
    }

    /// Resolve the stream for a title.
    ///
    /// The outer `Result` carries store failures; the inner one the per-title
    /// plan denial.
    pub async fn playback(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> AppResult<Result<PlaybackResponse, Denial>> {
        let id = parse_id(identifier)?;
        let content = queries::get_published_content_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content '{}' not found", identifier)))?;

        Ok(authorize_playback(ctx, content))
    }
}

/// Check the title's own plan requirement and build the descriptor.
pub fn authorize_playback(
    ctx: &RequestContext,
    content: Content,
) -> Result<PlaybackResponse, Denial> {
    Stage::PlanTier(content.required_plan)
        .evaluate(ctx)
        .into_result()?;

    if let Some(account) = ctx.account() {
        tracing::info!(account_id = %account.id, content_id = %content.id, "Playback authorised");
    }

    Ok(PlaybackResponse {
        content_id: content.id,
        title: content.title,
        stream_path: content.stream_path,
    })
}

/// Attach `playable` for resolved viewers; anonymous viewers get none.
pub fn annotate(ctx: &RequestContext, items: Vec<Content>) -> Vec<ContentSummary> {
    let subscriber = !ctx.is_anonymous() && AccessPolicy::subscriber().evaluate(ctx).is_continue();

    items
        .into_iter()
        .map(|content| {
            let playable = (!ctx.is_anonymous()).then(|| {
                subscriber
                    && Stage::PlanTier(content.required_plan)
                        .evaluate(ctx)
                        .is_continue()
            });
            ContentSummary { content, playable }
        })
        .collect()
}
