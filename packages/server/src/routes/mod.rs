use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
        .nest("/categories", category_routes())
        .nest("/tags", tag_routes())
        .nest("/search", search_routes())
        .nest("/user", user_routes())
        .nest("/projects", project_routes())
        .merge(plugin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn post_routes() -> Router<AppState> {
    // Static segments (admin, id) win over the `{slug}` capture.
    Router::new()
        .route(
            "/",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/admin/all", get(handlers::post::list_own_posts))
        .route("/id/{id}", get(handlers::post::get_post_for_edit))
        .route(
            "/{slug}",
            get(handlers::post::get_post_by_slug)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route(
            "/{slug}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/approve", patch(handlers::comment::approve_comment))
        .route("/{id}", delete(handlers::comment::delete_comment))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/{slug}",
            get(handlers::category::get_category_by_slug)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::tag::list_tags).post(handlers::tag::create_tag),
        )
        .route(
            "/{slug}",
            get(handlers::tag::get_tag_by_slug)
                .put(handlers::tag::update_tag)
                .delete(handlers::tag::delete_tag),
        )
}

fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search::search_posts))
        .route("/suggestions", get(handlers::search::search_suggestions))
        .route("/popular", get(handlers::search::search_popular))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/me", delete(handlers::user::delete_account))
}

fn project_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::project::list_projects).post(handlers::project::create_project),
    )
}

fn plugin_routes() -> Router<AppState> {
    Router::new()
        .route("/plugins", get(handlers::plugin::list_plugins))
        .route(
            "/plugins/{id}/toggle",
            patch(handlers::plugin::toggle_plugin),
        )
        .route("/themes", get(handlers::plugin::list_themes))
        .route(
            "/themes/{id}/activate",
            post(handlers::plugin::activate_theme),
        )
}
