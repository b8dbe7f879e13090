use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 5)]
    pub total_pages: u64,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a trimmed display name (1-64 Unicode characters).
pub fn validate_name(name: &str, what: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(format!(
            "{what} must be 1-64 characters"
        )));
    }
    Ok(())
}

/// Embedded author info on public post payloads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthorSummary {
    #[schema(example = "alice")]
    pub nickname: String,
}

/// Embedded category info on post payloads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategorySummary {
    pub id: i32,
    #[schema(example = "Technology")]
    pub name: String,
    #[schema(example = "technology")]
    pub slug: String,
    #[schema(example = "#3182CE")]
    pub color: Option<String>,
}

/// Embedded tag info on post payloads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TagSummary {
    pub id: i32,
    #[schema(example = "Rust")]
    pub name: String,
    #[schema(example = "rust")]
    pub slug: String,
}

impl From<crate::entity::category::Model> for CategorySummary {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            color: m.color,
        }
    }
}

impl From<crate::entity::tag::Model> for TagSummary {
    fn from(m: crate::entity::tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
        }
    }
}
