use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn category_creation_derives_the_slug_from_the_name() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let res = app
        .post_with_token(
            routes::CATEGORIES,
            &json!({"name": "Web Development", "color": "#3182CE"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.body["slug"], "web-development");
    assert_eq!(res.body["color"], "#3182CE");
}

#[tokio::test]
async fn cannot_create_a_category_without_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::CATEGORIES, &json!({"name": "Technology"}))
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_category(&token, "Technology").await;

    let res = app
        .post_with_token(routes::CATEGORIES, &json!({"name": "Technology"}), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_colors_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let res = app
        .post_with_token(
            routes::CATEGORIES,
            &json!({"name": "Technology", "color": "blue"}),
            &token,
        )
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
    let tech = app.create_category(&token, "Technology").await;
    app.create_category(&token, "Travel").await;

    for (title, status) in [("Public", "PUBLISHED"), ("Hidden", "DRAFT")] {
        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({
                    "title": title,
                    "content": "Body",
                    "status": status,
                    "category_id": tech,
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
    }

    let res = app.get_without_token(routes::CATEGORIES).await;

    assert_eq!(res.status, 200);
    let categories = res.body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    // Sorted by name: Technology before Travel.
    assert_eq!(categories[0]["name"], "Technology");
    assert_eq!(categories[0]["post_count"], 1);
    assert_eq!(categories[1]["post_count"], 0);
}

#[tokio::test]
async fn category_detail_lists_its_published_posts() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let tech = app.create_category(&token, "Technology").await;
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "In Tech",
                "content": "Body",
                "status": "PUBLISHED",
                "category_id": tech,
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app
        .get_without_token(&routes::category_by_slug("technology"))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["category"]["name"], "Technology");
    assert_eq!(res.body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["pagination"]["total"], 1);
}

#[tokio::test]
async fn renaming_a_category_regenerates_the_slug() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_category(&token, "Technology").await;

    let res = app
        .put_with_token(
            &routes::category_by_id(id),
            &json!({"name": "Deep Tech"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "update failed: {}", res.text);
    assert_eq!(res.body["name"], "Deep Tech");
    assert_eq!(res.body["slug"], "deep-tech");
}

#[tokio::test]
async fn a_category_still_in_use_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_category(&token, "Technology").await;
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({"title": "Uses Category", "content": "Body", "category_id": id}),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app
        .delete_with_token(&routes::category_by_id(id), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn an_unused_category_can_be_deleted() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let id = app.create_category(&token, "Technology").await;

    let res = app
        .delete_with_token(&routes::category_by_id(id), &token)
        .await;

    assert_eq!(res.status, 200);
    assert!(res.body["message"].is_string());

    let gone = app
        .get_without_token(&routes::category_by_slug("technology"))
        .await;
    assert_eq!(gone.status, 404);
}
