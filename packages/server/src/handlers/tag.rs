use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{post, post_tag, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::post::DeleteResponse;
use crate::models::tag::*;
use crate::state::AppState;
use crate::utils::slug::slugify;

use super::post::{hydrate_post_list, tagged_post_ids};

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "Tags",
    operation_id = "createTag",
    summary = "Create a tag",
    description = "The slug is derived from the name. A name that slugs to an existing slug is rejected.",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name = %payload.name))]
pub async fn create_tag(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_tag_name(&payload.name)?;

    let new_tag = tag::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        slug: Set(slugify(&payload.name)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_tag
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Validation("A tag with this name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(TagResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    operation_id = "listTags",
    summary = "List all tags with published-post counts",
    responses(
        (status = 200, description = "All tags", body = TagListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, AppError> {
    let models = tag::Entity::find()
        .order_by_asc(tag::Column::Name)
        .all(&state.db)
        .await?;

    let counts = published_counts_by_tag(&state.db).await?;

    let tags = models
        .into_iter()
        .map(|m| TagListItem {
            post_count: counts.get(&m.id).copied().unwrap_or(0) as u64,
            id: m.id,
            name: m.name,
            slug: m.slug,
        })
        .collect();

    Ok(Json(TagListResponse { tags }))
}

#[utoipa::path(
    get,
    path = "/api/tags/{slug}",
    tag = "Tags",
    operation_id = "getTagBySlug",
    summary = "Get a tag and a page of its published posts",
    params(
        ("slug" = String, Path, description = "Tag slug"),
        TagPostsQuery,
    ),
    responses(
        (status = 200, description = "Tag details", body = TagDetailResponse),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(slug))]
pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    Query(query): Query<TagPostsQuery>,
) -> Result<Json<TagDetailResponse>, AppError> {
    let model = tag::Entity::find()
        .filter(tag::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".into()))?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let select = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(post::Column::Id.in_subquery(tagged_post_ids(vec![model.slug.clone()])));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let posts = select
        .order_by_desc(post::Column::PublishedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;
    let posts = hydrate_post_list(&state.db, posts).await?;

    Ok(Json(TagDetailResponse {
        tag: TagResponse::from(model),
        posts,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    tag = "Tags",
    operation_id = "updateTag",
    summary = "Rename a tag",
    description = "Renaming regenerates the slug.",
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_tag(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateTagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    validate_tag_name(&payload.name)?;

    let existing = tag::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".into()))?;

    let mut active: tag::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.slug = Set(slugify(&payload.name));

    let model = active
        .update(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Validation("A tag with this name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok(Json(TagResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    tag = "Tags",
    operation_id = "deleteTag",
    summary = "Delete a tag",
    description = "Refused while any post still carries the tag.",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deleted", body = DeleteResponse),
        (status = 400, description = "Tag still in use (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn delete_tag(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let txn = state.db.begin().await?;

    let model = tag::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".into()))?;

    let in_use = post_tag::Entity::find()
        .filter(post_tag::Column::TagId.eq(model.id))
        .count(&txn)
        .await?;
    if in_use > 0 {
        return Err(AppError::Validation(format!(
            "Tag is still used by {in_use} post(s)"
        )));
    }

    tag::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(DeleteResponse {
        message: "Tag deleted successfully".into(),
    }))
}

/// Published-post count per tag, keyed by tag ID.
async fn published_counts_by_tag(db: &DatabaseConnection) -> Result<HashMap<i32, i64>, AppError> {
    let counts = post_tag::Entity::find()
        .inner_join(post::Entity)
        .filter(post::Column::Published.eq(true))
        .select_only()
        .column(post_tag::Column::TagId)
        .column_as(post_tag::Column::PostId.count(), "cnt")
        .group_by(post_tag::Column::TagId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    Ok(counts)
}
