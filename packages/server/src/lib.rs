pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod site;
pub mod state;
pub mod utils;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill Blogging API",
        version = "1.0.0",
        description = "API for the Quill blogging platform"
    ),
    tags(
        (name = "Auth", description = "Registration, login, and the current-user profile"),
        (name = "Posts", description = "Post CRUD, publishing workflow, and public listings"),
        (name = "Comments", description = "Anonymous comments with owner moderation"),
        (name = "Categories", description = "Category CRUD and per-category listings"),
        (name = "Tags", description = "Tag CRUD and per-tag listings"),
        (name = "Search", description = "Full-text search, autocomplete, and popularity"),
        (name = "Account", description = "Account lifecycle"),
        (name = "Projects", description = "Per-user site scaffolds with isolated SQLite databases"),
        (name = "Plugins", description = "Reserved plugin and theme surface"),
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::post::create_post,
        handlers::post::list_posts,
        handlers::post::get_post_by_slug,
        handlers::post::list_own_posts,
        handlers::post::get_post_for_edit,
        handlers::post::update_post,
        handlers::post::delete_post,
        handlers::comment::list_comments,
        handlers::comment::create_comment,
        handlers::comment::approve_comment,
        handlers::comment::delete_comment,
        handlers::category::create_category,
        handlers::category::list_categories,
        handlers::category::get_category_by_slug,
        handlers::category::update_category,
        handlers::category::delete_category,
        handlers::tag::create_tag,
        handlers::tag::list_tags,
        handlers::tag::get_tag_by_slug,
        handlers::tag::update_tag,
        handlers::tag::delete_tag,
        handlers::search::search_posts,
        handlers::search::search_suggestions,
        handlers::search::search_popular,
        handlers::user::delete_account,
        handlers::project::list_projects,
        handlers::project::create_project,
        handlers::plugin::list_plugins,
        handlers::plugin::toggle_plugin,
        handlers::plugin::list_themes,
        handlers::plugin::activate_theme,
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(config.max_age));

    if config.allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let api = ApiDoc::openapi();

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
