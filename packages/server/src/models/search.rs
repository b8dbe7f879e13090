use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use super::post::{PostListItem, validate_status};
pub use super::shared::Pagination;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Free-text query against title, content, and excerpt.
    pub q: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Comma-separated tag slugs; any-match.
    pub tags: Option<String>,
    /// Matches against author email (contains, case-insensitive).
    pub author: Option<String>,
    /// Status filter; defaults to PUBLISHED, `all` disables the filter.
    pub status: Option<String>,
    pub featured: Option<bool>,
    /// One of: newest (default), oldest, title, views, likes.
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Lower bound on published_at (inclusive).
    pub date_from: Option<DateTime<Utc>>,
    /// Upper bound on published_at (inclusive).
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub posts: Vec<PostListItem>,
    pub pagination: Pagination,
    /// Title/tag-name completions, present when `q` is longer than 2 chars.
    pub suggestions: Vec<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SuggestionsQuery {
    pub q: Option<String>,
}

/// A typed autocomplete suggestion.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionItem {
    /// One of: post, tag, category.
    #[serde(rename = "type")]
    #[schema(example = "post")]
    pub kind: &'static str,
    pub text: String,
    pub slug: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<SuggestionItem>,
}

/// A tag or category ranked by published-post count.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PopularEntry {
    pub name: String,
    pub slug: String,
    pub count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PopularResponse {
    pub popular_tags: Vec<PopularEntry>,
    pub popular_categories: Vec<PopularEntry>,
}

pub fn validate_search_query(query: &SearchQuery) -> Result<(), AppError> {
    if let Some(ref s) = query.status
        && s != "all"
    {
        validate_status(s)?;
    }
    if let (Some(from), Some(to)) = (query.date_from, query.date_to)
        && from > to
    {
        return Err(AppError::Validation(
            "date_from must not be after date_to".into(),
        ));
    }
    Ok(())
}
