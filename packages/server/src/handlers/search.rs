use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::post::status;
use crate::entity::{category, post, post_tag, tag, user};
use crate::error::{AppError, ErrorBody};
use crate::models::search::*;
use crate::models::shared::escape_like;
use crate::state::AppState;

use super::post::{hydrate_post_list, parse_public_sort, split_tag_slugs, tagged_post_ids};

const SEARCH_SUGGESTION_LIMIT: usize = 8;
const AUTOCOMPLETE_LIMIT_PER_KIND: u64 = 5;
const POPULAR_LIMIT: usize = 5;

#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    operation_id = "searchPosts",
    summary = "Search posts",
    description = "Free-text search over title, content, and excerpt, combinable with category, tag, author, status, featured, and publication-date filters. Status defaults to PUBLISHED; pass `all` to disable.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = SearchResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    validate_search_query(&query)?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let mut select = post::Entity::find();

    match query.status.as_deref() {
        Some("all") => {}
        Some(s) => select = select.filter(post::Column::Status.eq(s)),
        None => select = select.filter(post::Column::Status.eq(status::PUBLISHED)),
    }

    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    if let Some(ref q) = term {
        let pattern = format!("%{}%", escape_like(q).to_lowercase());
        select = select.filter(
            Condition::any()
                .add(text_like(post::Column::Title, &pattern))
                .add(text_like(post::Column::Content, &pattern))
                .add(text_like(post::Column::Excerpt, &pattern)),
        );
    }

    if let Some(ref category_slug) = query.category {
        select = select.filter(
            post::Column::CategoryId.in_subquery(
                SeaQuery::select()
                    .column(category::Column::Id)
                    .from(category::Entity)
                    .and_where(category::Column::Slug.eq(category_slug.trim()))
                    .to_owned(),
            ),
        );
    }

    if let Some(ref tags_param) = query.tags {
        let slugs = split_tag_slugs(tags_param);
        if !slugs.is_empty() {
            select = select.filter(post::Column::Id.in_subquery(tagged_post_ids(slugs)));
        }
    }

    if let Some(ref author) = query.author {
        let pattern = format!("%{}%", escape_like(author.trim()).to_lowercase());
        select = select.filter(
            post::Column::AuthorId.in_subquery(
                SeaQuery::select()
                    .column(user::Column::Id)
                    .from(user::Entity)
                    .and_where(
                        Expr::expr(Func::lower(Expr::col(user::Column::Email)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    )
                    .to_owned(),
            ),
        );
    }

    if let Some(featured) = query.featured {
        select = select.filter(post::Column::Featured.eq(featured));
    }
    if let Some(from) = query.date_from {
        select = select.filter(post::Column::PublishedAt.gte(from));
    }
    if let Some(to) = query.date_to {
        select = select.filter(post::Column::PublishedAt.lte(to));
    }

    let (sort_column, sort_order) = parse_public_sort(query.sort.as_deref())?;

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let models = select
        .order_by(sort_column, sort_order)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;
    let posts = hydrate_post_list(&state.db, models).await?;

    let suggestions = match term {
        Some(ref q) if q.chars().count() > 2 => completion_strings(&state.db, q).await?,
        _ => Vec::new(),
    };

    Ok(Json(SearchResponse {
        posts,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
        suggestions,
    }))
}

#[utoipa::path(
    get,
    path = "/api/search/suggestions",
    tag = "Search",
    operation_id = "searchSuggestions",
    summary = "Typed autocomplete suggestions",
    description = "Returns post, tag, and category completions for a prefix of at least 2 characters.",
    params(SuggestionsQuery),
    responses(
        (status = 200, description = "Autocomplete items", body = SuggestionsResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| q.chars().count() >= 2);

    let Some(q) = term else {
        return Ok(Json(SuggestionsResponse {
            suggestions: Vec::new(),
        }));
    };

    let pattern = format!("%{}%", escape_like(q).to_lowercase());
    let mut suggestions = Vec::new();

    let posts = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(text_like(post::Column::Title, &pattern))
        .order_by_desc(post::Column::Views)
        .limit(Some(AUTOCOMPLETE_LIMIT_PER_KIND))
        .all(&state.db)
        .await?;
    for p in posts {
        suggestions.push(SuggestionItem {
            kind: "post",
            text: p.title,
            slug: p.slug,
        });
    }

    let tags = tag::Entity::find()
        .filter(text_like(tag::Column::Name, &pattern))
        .order_by_asc(tag::Column::Name)
        .limit(Some(AUTOCOMPLETE_LIMIT_PER_KIND))
        .all(&state.db)
        .await?;
    for t in tags {
        suggestions.push(SuggestionItem {
            kind: "tag",
            text: t.name,
            slug: t.slug,
        });
    }

    let categories = category::Entity::find()
        .filter(text_like(category::Column::Name, &pattern))
        .order_by_asc(category::Column::Name)
        .limit(Some(AUTOCOMPLETE_LIMIT_PER_KIND))
        .all(&state.db)
        .await?;
    for c in categories {
        suggestions.push(SuggestionItem {
            kind: "category",
            text: c.name,
            slug: c.slug,
        });
    }

    Ok(Json(SuggestionsResponse { suggestions }))
}

#[utoipa::path(
    get,
    path = "/api/search/popular",
    tag = "Search",
    operation_id = "searchPopular",
    summary = "Most-used tags and categories",
    description = "Tags and categories ranked by the number of published posts carrying them.",
    responses(
        (status = 200, description = "Popular tags and categories", body = PopularResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn search_popular(
    State(state): State<AppState>,
) -> Result<Json<PopularResponse>, AppError> {
    let tag_counts: HashMap<i32, i64> = post_tag::Entity::find()
        .inner_join(post::Entity)
        .filter(post::Column::Published.eq(true))
        .select_only()
        .column(post_tag::Column::TagId)
        .column_as(post_tag::Column::PostId.count(), "cnt")
        .group_by(post_tag::Column::TagId)
        .into_tuple::<(i32, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();

    let mut popular_tags: Vec<PopularEntry> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_counts.keys().copied().collect::<Vec<_>>()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| PopularEntry {
            count: tag_counts.get(&t.id).copied().unwrap_or(0) as u64,
            name: t.name,
            slug: t.slug,
        })
        .collect();
    popular_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    popular_tags.truncate(POPULAR_LIMIT);

    let category_counts: HashMap<i32, i64> = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(post::Column::CategoryId.is_not_null())
        .select_only()
        .column(post::Column::CategoryId)
        .column_as(post::Column::Id.count(), "cnt")
        .group_by(post::Column::CategoryId)
        .into_tuple::<(Option<i32>, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .filter_map(|(id, n)| id.map(|id| (id, n)))
        .collect();

    let mut popular_categories: Vec<PopularEntry> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_counts.keys().copied().collect::<Vec<_>>()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| PopularEntry {
            count: category_counts.get(&c.id).copied().unwrap_or(0) as u64,
            name: c.name,
            slug: c.slug,
        })
        .collect();
    popular_categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    popular_categories.truncate(POPULAR_LIMIT);

    Ok(Json(PopularResponse {
        popular_tags,
        popular_categories,
    }))
}

/// Up to eight title and tag-name completions for the main search response.
async fn completion_strings(db: &DatabaseConnection, q: &str) -> Result<Vec<String>, AppError> {
    let pattern = format!("%{}%", escape_like(q).to_lowercase());
    let mut out: Vec<String> = Vec::new();

    let titles = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(text_like(post::Column::Title, &pattern))
        .order_by_desc(post::Column::Views)
        .limit(Some(AUTOCOMPLETE_LIMIT_PER_KIND))
        .all(db)
        .await?;
    out.extend(titles.into_iter().map(|p| p.title));

    let tags = tag::Entity::find()
        .filter(text_like(tag::Column::Name, &pattern))
        .order_by_asc(tag::Column::Name)
        .limit(Some(AUTOCOMPLETE_LIMIT_PER_KIND))
        .all(db)
        .await?;
    out.extend(tags.into_iter().map(|t| t.name));

    out.truncate(SEARCH_SUGGESTION_LIMIT);
    Ok(out)
}

/// Case-insensitive LIKE against a text column; `pattern` is already
/// lowercased and escaped.
fn text_like<C: ColumnTrait>(column: C, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(pattern.to_string()).escape('\\'))
}
