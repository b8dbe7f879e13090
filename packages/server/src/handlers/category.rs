use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, post};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::category::*;
use crate::models::post::DeleteResponse;
use crate::state::AppState;
use crate::utils::slug::slugify;

use super::post::hydrate_post_list;

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "The slug is derived from the name. A name that slugs to an existing slug is rejected.",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name = %payload.name))]
pub async fn create_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_category(&payload)?;

    let new_category = category::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        slug: Set(slugify(&payload.name)),
        description: Set(payload.description),
        color: Set(payload.color),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_category
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Validation("A category with this name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories with published-post counts",
    responses(
        (status = 200, description = "All categories", body = CategoryListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let models = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;

    let counts: HashMap<i32, i64> = post::Entity::find()
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

    let categories = models
        .into_iter()
        .map(|m| CategoryListItem {
            post_count: counts.get(&m.id).copied().unwrap_or(0) as u64,
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            color: m.color,
        })
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    tag = "Categories",
    operation_id = "getCategoryBySlug",
    summary = "Get a category and a page of its published posts",
    params(
        ("slug" = String, Path, description = "Category slug"),
        CategoryPostsQuery,
    ),
    responses(
        (status = 200, description = "Category details", body = CategoryDetailResponse),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(slug))]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    Query(query): Query<CategoryPostsQuery>,
) -> Result<Json<CategoryDetailResponse>, AppError> {
    let model = category::Entity::find()
        .filter(category::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let select = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(post::Column::CategoryId.eq(model.id));

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

    Ok(Json(CategoryDetailResponse {
        category: CategoryResponse::from(model),
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
    path = "/api/categories/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    description = "Partial update; a name change regenerates the slug.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error or duplicate name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    validate_update_category(&payload)?;

    let existing = category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let mut active: category::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
        active.slug = Set(slugify(name));
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.clone());
    }
    if let Some(ref color) = payload.color {
        active.color = Set(color.clone());
    }

    let model = active
        .update(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Validation("A category with this name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok(Json(CategoryResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Refused while any post still references the category.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = DeleteResponse),
        (status = 400, description = "Category still in use (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn delete_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let txn = state.db.begin().await?;

    let model = category::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let in_use = post::Entity::find()
        .filter(post::Column::CategoryId.eq(model.id))
        .count(&txn)
        .await?;
    if in_use > 0 {
        return Err(AppError::Validation(format!(
            "Category is still used by {in_use} post(s)"
        )));
    }

    category::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(DeleteResponse {
        message: "Category deleted successfully".into(),
    }))
}
