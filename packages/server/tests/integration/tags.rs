use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn tag_creation_derives_the_slug_from_the_name() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let res = app
        .post_with_token(routes::TAGS, &json!({"name": "Machine Learning"}), &token)
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.body["slug"], "machine-learning");
}

#[tokio::test]
async fn cannot_create_a_tag_without_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::TAGS, &json!({"name": "Rust"}))
        .await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn duplicate_tag_names_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_tag(&token, "Rust").await;

    let res = app
        .post_with_token(routes::TAGS, &json!({"name": "Rust"}), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn listing_reports_published_post_counts() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let rust = app.create_tag(&token, "Rust").await;
    app.create_tag(&token, "Go").await;

    for (title, status) in [("Public", "PUBLISHED"), ("Hidden", "DRAFT")] {
        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({
                    "title": title,
                    "content": "Body",
                    "status": status,
                    "tag_ids": [rust],
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
    }

    let res = app.get_without_token(routes::TAGS).await;

    assert_eq!(res.status, 200);
    let tags = res.body["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);
    // Sorted by name: Go before Rust.
    assert_eq!(tags[0]["name"], "Go");
    assert_eq!(tags[0]["post_count"], 0);
    assert_eq!(tags[1]["post_count"], 1);
}

#[tokio::test]
async fn tag_detail_lists_its_published_posts() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let rust = app.create_tag(&token, "Rust").await;
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "About Rust",
                "content": "Body",
                "status": "PUBLISHED",
                "tag_ids": [rust],
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app.get_without_token(&routes::tag_by_slug("rust")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["tag"]["name"], "Rust");
    assert_eq!(res.body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["posts"][0]["title"], "About Rust");
}

#[tokio::test]
async fn renaming_a_tag_regenerates_the_slug() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_tag(&token, "Rust").await;

    let res = app
        .put_with_token(&routes::tag_by_id(id), &json!({"name": "Rust Lang"}), &token)
        .await;

    assert_eq!(res.status, 200, "update failed: {}", res.text);
    assert_eq!(res.body["slug"], "rust-lang");
}

#[tokio::test]
async fn a_tag_still_in_use_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_tag(&token, "Rust").await;
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({"title": "Uses Tag", "content": "Body", "tag_ids": [id]}),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app.delete_with_token(&routes::tag_by_id(id), &token).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn an_unused_tag_can_be_deleted() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_tag(&token, "Rust").await;

    let res = app.delete_with_token(&routes::tag_by_id(id), &token).await;

    assert_eq!(res.status, 200);

    let gone = app.get_without_token(&routes::tag_by_slug("rust")).await;
    assert_eq!(gone.status, 404);
}
