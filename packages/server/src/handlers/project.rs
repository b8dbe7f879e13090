use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::database::init_site_db;
use crate::entity::project;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::project::*;
use crate::state::AppState;
use crate::utils::slug::slugify;

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List the caller's projects",
    responses(
        (status = 200, description = "Caller's projects, newest first", body = [ProjectResponse]),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_projects(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let projects = project::Entity::find()
        .filter(project::Column::AuthorId.eq(auth_user.user_id))
        .order_by_desc(project::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(projects))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a project with its own SQLite site database",
    description = "Creates a directory under the configured projects root, provisions a fresh SQLite database inside it, and records the project.",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, name = %payload.name))]
pub async fn create_project(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_project(&payload)?;

    // Millisecond timestamp keeps directory names unique across same-named
    // projects without a separate uniqueness check.
    let dir_name = format!(
        "{}-{}",
        slugify(&payload.name),
        chrono::Utc::now().timestamp_millis()
    );
    let project_dir = std::path::Path::new(&state.config.projects.root).join(&dir_name);
    std::fs::create_dir_all(&project_dir)
        .map_err(|e| AppError::Internal(format!("Could not create project directory: {e}")))?;

    let db_path = project_dir.join("site.db");
    let db_path = db_path.to_string_lossy().to_string();

    let site_db = init_site_db(&db_path)
        .await
        .map_err(|e| AppError::Internal(format!("Could not provision site database: {e}")))?;
    site_db
        .close()
        .await
        .map_err(|e| AppError::Internal(format!("Could not close site database: {e}")))?;

    let new_project = project::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        file_path: Set(db_path),
        author_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_project.insert(&state.db).await?;

    tracing::info!(project_id = model.id, path = %model.file_path, "Project created");

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(model))))
}
