//! Error types for the OTT API server.
//!
//! [`AppError`] is the single terminal error handler of the request
//! pipeline. Every failure a handler or middleware returns is logged and then
//! normalised into the `{success: false, message, stack?}` envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::postgres::PgDatabaseError;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;

/// Postgres SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE for `invalid_text_representation` (e.g. a bad uuid literal).
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Identifier that cannot name any resource
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    /// Unique constraint violation
    #[error("Duplicate value for {field}: {value}")]
    UniqueViolation { field: String, value: String },

    /// Schema validation failure
    #[error("Validation error: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    /// Bearer token failed signature or structure checks
    #[error("Invalid token")]
    InvalidCredential,

    /// Bearer token is past its expiry
    #[error("Token expired")]
    ExpiredCredential,

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Explicit status chosen by a handler
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a handler-chosen status and message.
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error normalises to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedId(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueViolation { .. } => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredential | AppError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AppError::Status { status, .. } => *status,
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    ///
    /// Server-side failures never leak their internal description.
    pub fn client_message(&self) -> String {
        match self {
            AppError::MalformedId(_) => "Resource not found".to_string(),
            AppError::UniqueViolation { field, value } => unique_violation_message(field, value),
            AppError::Validation(errors) => join_messages(errors),
            AppError::InvalidCredential => "Invalid token".to_string(),
            AppError::ExpiredCredential => "Token expired".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Status { message, .. }
            | AppError::Internal(message)
            | AppError::Config(message) => or_server_error(message.clone()),
            AppError::Database(_) | AppError::Serialization(_) => {
                or_server_error(self.to_string())
            }
        }
    }
}

fn or_server_error(message: String) -> String {
    if message.trim().is_empty() {
        "Server Error".to_string()
    } else {
        message
    }
}

fn unique_violation_message(field: &str, value: &str) -> String {
    match field {
        "email" => "Email already exists".to_string(),
        "mobile" => "Mobile number already exists".to_string(),
        "name" => "Name already exists".to_string(),
        other => format!("{} must be unique: {}", capitalize(other), value),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse `Key (field)=(value) already exists.` from a Postgres error detail.
fn parse_unique_detail(detail: &str) -> Option<(String, String)> {
    let rest = detail.strip_prefix("Key (")?;
    let (field, rest) = rest.split_once(")=(")?;
    let value = rest
        .strip_suffix(") already exists.")
        .or_else(|| rest.split_once(')').map(|(v, _)| v))?;
    Some((normalize_field(field), value.to_string()))
}

/// `lower(email::text)` -> `email`
fn normalize_field(field: &str) -> String {
    let inner = match (field.find('('), field.rfind(')')) {
        (Some(open), Some(close)) if open < close => &field[open + 1..close],
        _ => field,
    };
    inner
        .split("::")
        .next()
        .unwrap_or(inner)
        .trim()
        .to_string()
}

/// `categories_slug_key` -> `slug`
fn field_from_constraint(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_key").unwrap_or(constraint);
    trimmed
        .split_once('_')
        .map(|(_, field)| field)
        .unwrap_or(trimmed)
        .to_string()
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    let parsed = db_err
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.detail())
                        .and_then(parse_unique_detail);
                    let (field, value) = parsed.unwrap_or_else(|| {
                        let field = db_err
                            .constraint()
                            .map(field_from_constraint)
                            .unwrap_or_else(|| "value".to_string());
                        (field, String::new())
                    });
                    return AppError::UniqueViolation { field, value };
                }
                Some(PG_INVALID_TEXT_REPRESENTATION) => {
                    return AppError::MalformedId(db_err.message().to_string());
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Client-facing error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    /// Build the envelope for `err`, with its debug rendering when `expose` is set.
    pub fn from_error(err: &AppError, expose: bool) -> Self {
        Self {
            success: false,
            message: err.client_message(),
            stack: expose.then(|| format!("{:?}", err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // The detailed envelope rides along for `expose_details` to swap in.
        let mut response = (status, Json(ErrorBody::from_error(&self, false))).into_response();
        response
            .extensions_mut()
            .insert(ErrorBody::from_error(&self, true));
        response
    }
}

/// Response mapper that applies the configured error detail policy.
///
/// Installed on the router with `map_response_with_state`. Error responses
/// get their `stack` field only when [`AppConfig::expose_error_details`]
/// allows it.
pub async fn expose_details(
    State(config): State<Arc<AppConfig>>,
    mut response: Response,
) -> Response {
    let Some(detailed) = response.extensions_mut().remove::<ErrorBody>() else {
        return response;
    };

    if !config.expose_error_details() {
        return response;
    }

    let status = response.status();
    (status, Json(detailed)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = AppError::MalformedId("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_message(), "Resource not found");
    }

    #[test]
    fn test_duplicate_email_message_ignores_value() {
        for value in ["a@example.com", "someone@else.org", ""] {
            let err = AppError::UniqueViolation {
                field: "email".to_string(),
                value: value.to_string(),
            };
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
            assert_eq!(err.client_message(), "Email already exists");
        }
    }

    #[test]
    fn test_duplicate_tailored_and_generic_messages() {
        let mobile = AppError::UniqueViolation {
            field: "mobile".to_string(),
            value: "+15550100".to_string(),
        };
        assert_eq!(mobile.client_message(), "Mobile number already exists");

        let name = AppError::UniqueViolation {
            field: "name".to_string(),
            value: "Drama".to_string(),
        };
        assert_eq!(name.client_message(), "Name already exists");

        let slug = AppError::UniqueViolation {
            field: "slug".to_string(),
            value: "drama".to_string(),
        };
        assert_eq!(slug.client_message(), "Slug must be unique: drama");
    }

    #[test]
    fn test_validation_joins_messages() {
        let err = AppError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("slug", "Slug may only contain lowercase letters, digits and '-'"),
        ]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.client_message(),
            "Name is required, Slug may only contain lowercase letters, digits and '-'"
        );
    }

    #[test]
    fn test_credential_errors() {
        assert_eq!(AppError::InvalidCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredential.client_message(), "Invalid token");
        assert_eq!(AppError::ExpiredCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ExpiredCredential.client_message(), "Token expired");
    }

    #[test]
    fn test_unknown_errors_fall_back() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "pool exhausted");

        let err = AppError::Internal(String::new());
        assert_eq!(err.client_message(), "Server Error");

        let err = AppError::Config("  ".to_string());
        assert_eq!(err.client_message(), "Server Error");

        let err = AppError::status(StatusCode::PAYMENT_REQUIRED, "Payment required");
        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(err.client_message(), "Payment required");

        let err = AppError::status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.client_message(), "Server Error");
    }

    #[test]
    fn test_parse_unique_detail() {
        assert_eq!(
            parse_unique_detail("Key (email)=(a@example.com) already exists."),
            Some(("email".to_string(), "a@example.com".to_string()))
        );
        assert_eq!(
            parse_unique_detail("Key (lower(name::text))=(drama) already exists."),
            Some(("name".to_string(), "drama".to_string()))
        );
        assert_eq!(parse_unique_detail("something else"), None);
    }

    #[test]
    fn test_field_from_constraint() {
        assert_eq!(field_from_constraint("categories_slug_key"), "slug");
        assert_eq!(field_from_constraint("accounts_email_key"), "email");
        assert_eq!(field_from_constraint("email"), "email");
    }

    #[test]
    fn test_sqlx_row_not_found_is_server_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), err.to_string());
    }

    #[test]
    fn test_duplicate_email_detail_to_conflict_message() {
        for detail in [
            "Key (email)=(first@example.com) already exists.",
            "Key (lower(email::text))=(Second@Example.org) already exists.",
        ] {
            let (field, value) = parse_unique_detail(detail).unwrap();
            let err = AppError::UniqueViolation { field, value };
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
            assert_eq!(err.client_message(), "Email already exists");
        }
    }

    #[test]
    fn test_error_body_stack_only_when_exposed() {
        let err = AppError::Internal("boom".to_string());

        let hidden = ErrorBody::from_error(&err, false);
        let json = serde_json::to_value(&hidden).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "boom");
        assert!(json.get("stack").is_none());

        let shown = ErrorBody::from_error(&err, true);
        let json = serde_json::to_value(&shown).unwrap();
        assert!(json["stack"].as_str().unwrap().contains("boom"));
    }

    async fn mapped_body(config: AppConfig, response: Response) -> serde_json::Value {
        let response = expose_details(State(Arc::new(config)), response).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_expose_details_follows_environment() {
        use crate::config::Environment;

        let err = || AppError::MalformedId("abc".to_string()).into_response();

        let development = AppConfig::default();
        let body = mapped_body(development, err()).await;
        assert_eq!(body["message"], "Resource not found");
        assert!(body["stack"].as_str().unwrap().contains("MalformedId"));

        let production = AppConfig {
            environment: Environment::Production,
            ..AppConfig::default()
        };
        let body = mapped_body(production, err()).await;
        assert_eq!(body["message"], "Resource not found");
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_expose_details_ignores_other_responses() {
        let ok = (StatusCode::OK, Json(serde_json::json!({"success": true}))).into_response();
        let body = mapped_body(AppConfig::default(), ok).await;
        assert_eq!(body, serde_json::json!({"success": true}));
    }
}
