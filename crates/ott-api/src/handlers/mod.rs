//! HTTP handlers for the OTT API.
//!
//! This module contains all route handlers organized by domain, plus the
//! success envelope and JSON body extractor they share.

pub mod auth;
pub mod categories;
pub mod content;
pub mod database;
pub mod health;

use axum::{extract::FromRequest, http::Uri, Json};
use serde::Serialize;

use crate::error::AppError;

pub use health::{api_health, health_check};

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// JSON body extractor whose rejections go through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Not Found - {}", uri.path()))
}
