use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, post};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::comment::*;
use crate::models::post::DeleteResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/posts/{slug}/comments",
    tag = "Comments",
    operation_id = "listComments",
    summary = "List approved comments of a published post",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Approved comments, oldest first", body = CommentListResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(slug))]
pub async fn list_comments(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<CommentListResponse>, AppError> {
    let post = find_published_post(&state.db, &slug).await?;

    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post.id))
        .filter(comment::Column::Approved.eq(true))
        .order_by_asc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(Json(CommentListResponse { comments }))
}

#[utoipa::path(
    post,
    path = "/api/posts/{slug}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Leave a comment on a published post",
    description = "Comments start unapproved and stay invisible until the post owner approves them.",
    params(("slug" = String, Path, description = "Post slug")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created, pending approval", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(slug))]
pub async fn create_comment(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_comment(&payload)?;

    let post = find_published_post(&state.db, &slug).await?;

    if let Some(parent_id) = payload.parent_id {
        let parent = comment::Entity::find_by_id(parent_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Validation("Parent comment does not exist".into()))?;
        if parent.post_id != post.id {
            return Err(AppError::Validation(
                "Parent comment belongs to another post".into(),
            ));
        }
    }

    let new_comment = comment::ActiveModel {
        content: Set(payload.content.trim().to_string()),
        author_name: Set(payload.author_name.trim().to_string()),
        author_email: Set(payload.author_email.trim().to_lowercase()),
        author_website: Set(payload.author_website),
        approved: Set(false),
        post_id: Set(post.id),
        parent_id: Set(payload.parent_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_comment.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/comments/{id}/approve",
    tag = "Comments",
    operation_id = "approveComment",
    summary = "Approve a comment (post owner only)",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment approved", body = CommentResponse),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the post owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn approve_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CommentResponse>, AppError> {
    let model = find_comment_on_own_post(&state.db, id, auth_user.user_id).await?;

    let mut active: comment::ActiveModel = model.into();
    active.approved = Set(true);
    let model = active.update(&state.db).await?;

    Ok(Json(CommentResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment (post owner only)",
    description = "Replies to the deleted comment are kept and become top-level.",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = DeleteResponse),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the post owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let model = find_comment_on_own_post(&state.db, id, auth_user.user_id).await?;

    let txn = state.db.begin().await?;
    comment::Entity::update_many()
        .col_expr(comment::Column::ParentId, Expr::value(Value::Int(None)))
        .filter(comment::Column::ParentId.eq(model.id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(DeleteResponse {
        message: "Comment deleted successfully".into(),
    }))
}

async fn find_published_post(db: &DatabaseConnection, slug: &str) -> Result<post::Model, AppError> {
    post::Entity::find()
        .filter(post::Column::Slug.eq(slug))
        .filter(post::Column::Published.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

/// Load a comment and enforce that the caller owns the commented post.
async fn find_comment_on_own_post(
    db: &DatabaseConnection,
    id: i32,
    user_id: i32,
) -> Result<comment::Model, AppError> {
    let model = comment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    let post = post::Entity::find_by_id(model.post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    if post.author_id != user_id {
        return Err(AppError::PermissionDenied);
    }

    Ok(model)
}
