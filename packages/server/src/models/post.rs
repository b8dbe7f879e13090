use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::post::{self, status};
use crate::error::AppError;

pub use super::shared::{AuthorSummary, CategorySummary, Pagination, TagSummary, escape_like};
use super::shared::{double_option, validate_title};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Hello World")]
    pub title: String,
    /// Post body in Markdown.
    pub content: String,
    pub excerpt: Option<String>,
    /// One of DRAFT, PUBLISHED, SCHEDULED, PRIVATE. Defaults to DRAFT.
    #[schema(example = "DRAFT")]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    /// Publication date for SCHEDULED posts. Persisted as-is.
    pub scheduled_at: Option<DateTime<Utc>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
}

/// PATCH-like update: absent fields are left unchanged; nullable fields
/// distinguish "absent" from "set to null" (see `double_option`).
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub excerpt: Option<Option<String>>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    /// Replaces the full tag set when present.
    pub tag_ids: Option<Vec<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meta_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meta_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub keywords: Option<Option<String>>,
}

/// Full post payload returned from create/update and the owner edit route.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    #[schema(example = "hello-world")]
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[schema(example = "PUBLISHED")]
    pub status: String,
    pub featured: bool,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes: i32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub author_id: i32,
    pub category_id: Option<i32>,
    /// IDs of the post's tags.
    pub tag_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn from_model(m: post::Model, tag_ids: Vec<i32>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            content: m.content,
            excerpt: m.excerpt,
            status: m.status,
            featured: m.featured,
            published: m.published,
            published_at: m.published_at,
            scheduled_at: m.scheduled_at,
            views: m.views,
            likes: m.likes,
            meta_title: m.meta_title,
            meta_description: m.meta_description,
            keywords: m.keywords,
            author_id: m.author_id,
            category_id: m.category_id,
            tag_ids,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Public single-post payload with embedded author/category/tags.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostDetailResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes: i32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub author: AuthorSummary,
    pub category: Option<CategorySummary>,
    pub tags: Vec<TagSummary>,
    pub comment_count: u64,
}

/// One entry in a public post listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListItem {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes: i32,
    pub author: AuthorSummary,
    pub category: Option<CategorySummary>,
    pub tags: Vec<TagSummary>,
    pub comment_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    pub data: Vec<PostListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Category slug.
    pub category: Option<String>,
    /// Comma-separated tag slugs; posts matching any of them are returned.
    pub tags: Option<String>,
    pub featured: Option<bool>,
    /// One of: newest (default), oldest, title, views, likes.
    pub sort: Option<String>,
}

/// One entry in the owner's admin listing; includes non-public fields.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminPostListItem {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub featured: bool,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes: i32,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<post::Model> for AdminPostListItem {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            status: m.status,
            featured: m.featured,
            published: m.published,
            published_at: m.published_at,
            scheduled_at: m.scheduled_at,
            views: m.views,
            likes: m.likes,
            category_id: m.category_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminPostListResponse {
    pub data: Vec<AdminPostListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct AdminPostListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Filter by status (DRAFT, PUBLISHED, SCHEDULED, PRIVATE).
    pub status: Option<String>,
    /// Case-insensitive title search.
    pub search: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Post deleted successfully")]
    pub message: String,
}

pub fn validate_status(s: &str) -> Result<(), AppError> {
    if status::ALL.contains(&s) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Status must be one of: {}",
        status::ALL.join(", ")
    )))
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() || content.len() > 1_000_000 {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    Ok(())
}

fn validate_excerpt(excerpt: &str) -> Result<(), AppError> {
    if excerpt.chars().count() > 500 {
        return Err(AppError::Validation(
            "Excerpt must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

fn validate_meta(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be at most 256 characters"
        )));
    }
    Ok(())
}

pub fn validate_create_post(req: &CreatePostRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_content(&req.content)?;
    if let Some(ref s) = req.status {
        validate_status(s)?;
    }
    if let Some(ref excerpt) = req.excerpt {
        validate_excerpt(excerpt)?;
    }
    if let Some(ref v) = req.meta_title {
        validate_meta("meta_title", v)?;
    }
    if let Some(ref v) = req.meta_description {
        validate_meta("meta_description", v)?;
    }
    if let Some(ref v) = req.keywords {
        validate_meta("keywords", v)?;
    }
    Ok(())
}

pub fn validate_update_post(req: &UpdatePostRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref content) = req.content {
        validate_content(content)?;
    }
    if let Some(ref s) = req.status {
        validate_status(s)?;
    }
    if let Some(Some(ref excerpt)) = req.excerpt {
        validate_excerpt(excerpt)?;
    }
    if let Some(Some(ref v)) = req.meta_title {
        validate_meta("meta_title", v)?;
    }
    if let Some(Some(ref v)) = req.meta_description {
        validate_meta("meta_description", v)?;
    }
    if let Some(Some(ref v)) = req.keywords {
        validate_meta("keywords", v)?;
    }
    Ok(())
}
