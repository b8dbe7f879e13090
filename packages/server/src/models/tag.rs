use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::tag;
use crate::error::AppError;

pub use super::shared::Pagination;
use super::post::PostListItem;
use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    #[schema(example = "Rust")]
    pub name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateTagRequest {
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    #[schema(example = "rust")]
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Listing entry: tag plus its published-post count.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub post_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListResponse {
    pub tags: Vec<TagListItem>,
}

/// A tag with a page of its published posts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TagDetailResponse {
    pub tag: TagResponse,
    pub posts: Vec<PostListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TagPostsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl From<tag::Model> for TagResponse {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            created_at: m.created_at,
        }
    }
}

pub fn validate_tag_name(name: &str) -> Result<(), AppError> {
    validate_name(name, "Tag name")
}
