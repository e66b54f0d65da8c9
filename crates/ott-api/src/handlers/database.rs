//! Database schema handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::pool::REQUIRED_TABLES;
use crate::db::DbPool;
use crate::error::AppResult;

/// Response for schema validation.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaValidationResponse {
    pub success: bool,
    pub valid: bool,
    pub message: String,
    pub tables: Vec<String>,
    pub missing: Vec<String>,
}

/// Validate the database schema.
///
/// GET /api/db/validate
///
/// Checks that every table the service reads is present.
pub async fn validate_database(
    State(db): State<DbPool>,
) -> AppResult<Json<SchemaValidationResponse>> {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = current_schema()",
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(schema_report(tables)))
}

fn schema_report(tables: Vec<String>) -> SchemaValidationResponse {
    let missing: Vec<String> = REQUIRED_TABLES
        .iter()
        .filter(|t| !tables.iter().any(|existing| existing == *t))
        .map(|t| t.to_string())
        .collect();

    let valid = missing.is_empty();

    SchemaValidationResponse {
        success: true,
        valid,
        message: if valid {
            "Database schema is valid".to_string()
        } else {
            format!("Missing tables: {}", missing.join(", "))
        },
        tables,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_report_missing_tables() {
        let report = schema_report(vec!["accounts".to_string(), "_sqlx_migrations".to_string()]);
        assert!(!report.valid);
        assert_eq!(report.missing, vec!["categories", "content"]);
        assert_eq!(report.message, "Missing tables: categories, content");
    }

    #[test]
    fn test_schema_report_valid() {
        let tables = REQUIRED_TABLES.iter().map(|t| t.to_string()).collect();
        let report = schema_report(tables);
        assert!(report.valid);
        assert!(report.missing.is_empty());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"valid\":true"));
    }
}
