use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn free_text_search_matches_title_and_content() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;

    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "Cooking pasta",
                "content": "A guide to carbonara.",
                "status": "PUBLISHED",
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);
    app.create_post(&token, "Gardening", "PUBLISHED").await;

    let by_title = app
        .get_without_token(&format!("{}?q=pasta", routes::SEARCH))
        .await;
    assert_eq!(by_title.status, 200);
    assert_eq!(by_title.body["posts"].as_array().unwrap().len(), 1);

    let by_content = app
        .get_without_token(&format!("{}?q=carbonara", routes::SEARCH))
        .await;
    assert_eq!(by_content.body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(by_content.body["posts"][0]["title"], "Cooking pasta");
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_post(&token, "Cooking Pasta", "PUBLISHED").await;

    let res = app
        .get_without_token(&format!("{}?q=PASTA", routes::SEARCH))
        .await;

    assert_eq!(res.body["posts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_defaults_to_published_posts_only() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_post(&token, "Pasta draft", "DRAFT").await;
    app.create_post(&token, "Pasta published", "PUBLISHED").await;

    let default = app
        .get_without_token(&format!("{}?q=pasta", routes::SEARCH))
        .await;
    assert_eq!(default.body["posts"].as_array().unwrap().len(), 1);

    let all = app
        .get_without_token(&format!("{}?q=pasta&status=all", routes::SEARCH))
        .await;
    assert_eq!(all.body["posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_rejects_an_unknown_status() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&format!("{}?status=LIMBO", routes::SEARCH))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn search_rejects_an_inverted_date_range() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&format!(
            "{}?date_from=2025-06-01T00:00:00Z&date_to=2025-01-01T00:00:00Z",
            routes::SEARCH
        ))
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn search_can_combine_tag_and_author_filters() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "bob")
        .await;
    let rust = app.create_tag(&alice, "Rust").await;

    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "Alice on Rust",
                "content": "Body",
                "status": "PUBLISHED",
                "tag_ids": [rust],
            }),
            &alice,
        )
        .await;
    assert_eq!(res.status, 201);
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "Bob on Rust",
                "content": "Body",
                "status": "PUBLISHED",
                "tag_ids": [rust],
            }),
            &bob,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app
        .get_without_token(&format!("{}?tags=rust&author=alice", routes::SEARCH))
        .await;

    let posts = res.body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Alice on Rust");
}

#[tokio::test]
async fn long_queries_come_back_with_completions() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_post(&token, "Rustaceans unite", "PUBLISHED").await;

    let short = app
        .get_without_token(&format!("{}?q=ru", routes::SEARCH))
        .await;
    assert!(short.body["suggestions"].as_array().unwrap().is_empty());

    let long = app
        .get_without_token(&format!("{}?q=rust", routes::SEARCH))
        .await;
    let suggestions = long.body["suggestions"].as_array().unwrap();
    assert!(suggestions.contains(&json!("Rustaceans unite")));
}

#[tokio::test]
async fn autocomplete_returns_typed_items() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    app.create_post(&token, "Rust tips", "PUBLISHED").await;
    app.create_tag(&token, "Rust").await;
    app.create_category(&token, "Rust News").await;

    let res = app
        .get_without_token(&format!("{}?q=rust", routes::SEARCH_SUGGESTIONS))
        .await;

    assert_eq!(res.status, 200);
    let suggestions = res.body["suggestions"].as_array().unwrap();
    let kinds: Vec<&str> = suggestions
        .iter()
        .map(|s| s["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"post"));
    assert!(kinds.contains(&"tag"));
    assert!(kinds.contains(&"category"));

    let empty = app
        .get_without_token(&format!("{}?q=r", routes::SEARCH_SUGGESTIONS))
        .await;
    assert!(empty.body["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn popularity_ranks_by_published_post_count() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let rust = app.create_tag(&token, "Rust").await;
    let go = app.create_tag(&token, "Go").await;

    for i in 0..2 {
        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({
                    "title": format!("Rust post {i}"),
                    "content": "Body",
                    "status": "PUBLISHED",
                    "tag_ids": [rust],
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
    }
    let res = app
        .post_with_token(
            routes::POSTS,
            &json!({
                "title": "Go post",
                "content": "Body",
                "status": "PUBLISHED",
                "tag_ids": [go],
            }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let res = app.get_without_token(routes::SEARCH_POPULAR).await;

    assert_eq!(res.status, 200);
    let tags = res.body["popular_tags"].as_array().unwrap();
    assert_eq!(tags[0]["slug"], "rust");
    assert_eq!(tags[0]["count"], 2);
    assert_eq!(tags[1]["slug"], "go");
}
