use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn creating_a_project_provisions_a_sqlite_database_on_disk() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let res = app
        .post_with_token(routes::PROJECTS, &json!({"name": "My Travel Blog"}), &token)
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.body["name"], "My Travel Blog");

    let file_path = res.body["file_path"].as_str().unwrap();
    assert!(file_path.ends_with("site.db"));
    assert!(
        std::path::Path::new(file_path).exists(),
        "site database should exist at {file_path}"
    );
}

#[tokio::test]
async fn same_named_projects_get_distinct_directories() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let first = app
        .post_with_token(routes::PROJECTS, &json!({"name": "Blog"}), &token)
        .await;
    let second = app
        .post_with_token(routes::PROJECTS, &json!({"name": "Blog"}), &token)
        .await;

    assert_eq!(first.status, 201);
    assert_eq!(second.status, 201);
    assert_ne!(first.body["file_path"], second.body["file_path"]);
}

#[tokio::test]
async fn project_listing_is_scoped_to_the_caller() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "bob")
        .await;

    let res = app
        .post_with_token(routes::PROJECTS, &json!({"name": "Alice's Site"}), &alice)
        .await;
    assert_eq!(res.status, 201);

    let own = app.get_with_token(routes::PROJECTS, &alice).await;
    assert_eq!(own.status, 200);
    assert_eq!(own.body.as_array().unwrap().len(), 1);

    let other = app.get_with_token(routes::PROJECTS, &bob).await;
    assert!(other.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn projects_require_authentication() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::PROJECTS, &json!({"name": "Anonymous"}))
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn plugin_and_theme_surfaces_are_not_implemented() {
    let app = TestApp::spawn().await;

    let plugins = app.get_without_token(routes::PLUGINS).await;
    assert_eq!(plugins.status, 501);
    assert_eq!(plugins.body["code"], "NOT_IMPLEMENTED");

    let themes = app.get_without_token(routes::THEMES).await;
    assert_eq!(themes.status, 501);
    assert_eq!(themes.body["code"], "NOT_IMPLEMENTED");
}
