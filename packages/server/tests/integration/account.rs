use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn deleting_the_account_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.delete_without_token(routes::ACCOUNT).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn deleting_the_account_removes_the_user_and_their_content() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Alice's Post", "PUBLISHED").await;
    app.create_comment(&slug, "A visitor comment").await;

    let res = app.delete_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(res.status, 200, "delete failed: {}", res.text);
    assert!(res.body["message"].is_string());

    // The post and everything hanging off it are gone.
    let gone = app.get_without_token(&routes::post_by_slug(&slug)).await;
    assert_eq!(gone.status, 404);

    let listing = app.get_without_token(routes::POSTS).await;
    assert!(listing.body["data"].as_array().unwrap().is_empty());

    // Credentials no longer work.
    let login = app
        .post_without_token(
            routes::LOGIN,
            &json!({"email": "alice@example.com", "password": "correct horse battery"}),
        )
        .await;
    assert_eq!(login.status, 401);

    // The old token no longer resolves to a user.
    let me = app.get_with_token(routes::ME, &token).await;
    assert_eq!(me.status, 404);
}

#[tokio::test]
async fn deleting_one_account_leaves_other_users_untouched() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "bob")
        .await;
    app.create_post(&alice, "Alice's Post", "PUBLISHED").await;
    app.create_post(&bob, "Bob's Post", "PUBLISHED").await;

    let res = app.delete_with_token(routes::ACCOUNT, &alice).await;
    assert_eq!(res.status, 200);

    let listing = app.get_without_token(routes::POSTS).await;
    let data = listing.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Bob's Post");

    let me = app.get_with_token(routes::ME, &bob).await;
    assert_eq!(me.status, 200);
}
