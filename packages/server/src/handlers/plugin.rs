use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/plugins",
    tag = "Plugins",
    operation_id = "listPlugins",
    summary = "List plugins (reserved)",
    responses(
        (status = 501, description = "Not implemented (NOT_IMPLEMENTED)", body = ErrorBody),
    ),
)]
#[instrument]
pub async fn list_plugins() -> impl IntoResponse {
    AppError::NotImplemented("Plugins are not available yet".into())
}

#[utoipa::path(
    patch,
    path = "/api/plugins/{id}/toggle",
    tag = "Plugins",
    operation_id = "togglePlugin",
    summary = "Toggle a plugin (reserved)",
    params(("id" = String, Path, description = "Plugin ID")),
    responses(
        (status = 501, description = "Not implemented (NOT_IMPLEMENTED)", body = ErrorBody),
    ),
)]
#[instrument]
pub async fn toggle_plugin() -> impl IntoResponse {
    AppError::NotImplemented("Plugins are not available yet".into())
}

#[utoipa::path(
    get,
    path = "/api/themes",
    tag = "Plugins",
    operation_id = "listThemes",
    summary = "List themes (reserved)",
    responses(
        (status = 501, description = "Not implemented (NOT_IMPLEMENTED)", body = ErrorBody),
    ),
)]
#[instrument]
pub async fn list_themes() -> impl IntoResponse {
    AppError::NotImplemented("Themes are not available yet".into())
}

#[utoipa::path(
    post,
    path = "/api/themes/{id}/activate",
    tag = "Plugins",
    operation_id = "activateTheme",
    summary = "Activate a theme (reserved)",
    params(("id" = String, Path, description = "Theme ID")),
    responses(
        (status = 501, description = "Not implemented (NOT_IMPLEMENTED)", body = ErrorBody),
    ),
)]
#[instrument]
pub async fn activate_theme() -> impl IntoResponse {
    AppError::NotImplemented("Themes are not available yet".into())
}
