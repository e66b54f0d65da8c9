//! Category database model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, FieldError};

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 60;
const DESCRIPTION_MAX_LEN: usize = 500;

/// Content category shown in the catalog navigation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,

    /// Derived from `name` when omitted
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A category request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl CategoryRequest {
    /// Validate and normalise the request, collecting every field failure.
    pub fn validate(self) -> Result<CategoryInput, AppError> {
        let mut errors = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let name_len = name.chars().count();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Category name is required"));
        } else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            errors.push(FieldError::new(
                "name",
                format!(
                    "Category name must be between {} and {} characters",
                    NAME_MIN_LEN, NAME_MAX_LEN
                ),
            ));
        }

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(name),
        };
        if !name.is_empty() && !is_valid_slug(&slug) {
            errors.push(FieldError::new(
                "slug",
                "Slug may only contain lowercase letters, digits and '-'",
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(ref d) = description {
            if d.chars().count() > DESCRIPTION_MAX_LEN {
                errors.push(FieldError::new(
                    "description",
                    format!(
                        "Description cannot exceed {} characters",
                        DESCRIPTION_MAX_LEN
                    ),
                ));
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(CategoryInput {
            name: name.to_string(),
            slug,
            description,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
