use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::AppError;

pub use super::shared::Pagination;
use super::shared::{double_option, validate_name};
use super::post::PostListItem;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Technology")]
    pub name: String,
    pub description: Option<String>,
    /// Hex color string, e.g. "#3182CE".
    pub color: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    #[schema(example = "technology")]
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing entry: category plus its published-post count.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryListItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub post_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryListItem>,
}

/// A category with a page of its published posts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryDetailResponse {
    pub category: CategoryResponse,
    pub posts: Vec<PostListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CategoryPostsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            color: m.color,
            created_at: m.created_at,
        }
    }
}

fn validate_color(color: &str) -> Result<(), AppError> {
    let ok = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(AppError::Validation(
            "Color must be a hex string like #3182CE".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Category name")?;
    if let Some(ref color) = req.color {
        validate_color(color)?;
    }
    Ok(())
}

pub fn validate_update_category(req: &UpdateCategoryRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name(name, "Category name")?;
    }
    if let Some(Some(ref color)) = req.color {
        validate_color(color)?;
    }
    Ok(())
}
