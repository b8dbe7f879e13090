use axum::Json;
use axum::extract::State;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, post, post_tag, post_view, project, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::post::DeleteResponse;
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/api/user/me",
    tag = "Account",
    operation_id = "deleteAccount",
    summary = "Delete the caller's account",
    description = "Removes the user's posts with their comments, tag links, and view rows, the user's projects, and finally the user row, all in one transaction.",
    responses(
        (status = 200, description = "Account deleted", body = DeleteResponse),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_account(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    let txn = state.db.begin().await?;

    let account = user::Entity::find_by_id(auth_user.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let own_posts = || {
        SeaQuery::select()
            .column(post::Column::Id)
            .from(post::Entity)
            .and_where(post::Column::AuthorId.eq(account.id))
            .to_owned()
    };

    post_view::Entity::delete_many()
        .filter(post_view::Column::PostId.in_subquery(own_posts()))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::PostId.in_subquery(own_posts()))
        .exec(&txn)
        .await?;
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.in_subquery(own_posts()))
        .exec(&txn)
        .await?;
    post::Entity::delete_many()
        .filter(post::Column::AuthorId.eq(account.id))
        .exec(&txn)
        .await?;
    project::Entity::delete_many()
        .filter(project::Column::AuthorId.eq(account.id))
        .exec(&txn)
        .await?;
    user::Entity::delete_by_id(account.id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(user_id = account.id, "Account deleted");

    Ok(Json(DeleteResponse {
        message: "Account deleted successfully".into(),
    }))
}
