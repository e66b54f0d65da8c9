//! Content (title) database model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::account::Plan;
use crate::error::AppError;

/// Published title in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    /// Minimum plan needed to play this title
    pub required_plan: Plan,
    /// Path of the stream manifest, only revealed on playback
    #[serde(skip_serializing)]
    pub stream_path: String,
    pub created_at: DateTime<Utc>,
}

/// Raw `content` row.
#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub category_id: Option<Uuid>,
    pub required_plan: String,
    pub stream_path: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(Content {
            id: row.id,
            title: row.title,
            description: row.description,
            category_id: row.category_id,
            required_plan: row.required_plan.parse()?,
            stream_path: row.stream_path,
            created_at: row.created_at,
        })
    }
}

/// Catalog entry as returned to viewers.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    #[serde(flatten)]
    pub content: Content,

    /// Whether the requesting account can play the title; absent for anonymous viewers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playable: Option<bool>,
}

/// Playback descriptor for an authorised viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackResponse {
    pub content_id: Uuid,
    pub title: String,
    pub stream_path: String,
}
