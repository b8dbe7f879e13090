use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn a_new_comment_starts_unapproved_and_stays_hidden() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Commented", "PUBLISHED").await;

    let res = app
        .post_without_token(
            &routes::post_comments(&slug),
            &json!({
                "content": "Nice post!",
                "author_name": "Visitor",
                "author_email": "visitor@example.com",
            }),
        )
        .await;
    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.body["approved"], false);

    let listed = app.get_without_token(&routes::post_comments(&slug)).await;
    assert_eq!(listed.status, 200);
    assert!(listed.body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn comment_responses_never_expose_the_author_email() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Commented", "PUBLISHED").await;

    let res = app
        .post_without_token(
            &routes::post_comments(&slug),
            &json!({
                "content": "Nice post!",
                "author_name": "Visitor",
                "author_email": "visitor@example.com",
            }),
        )
        .await;

    assert_eq!(res.status, 201);
    assert!(res.body.get("author_email").is_none());
}

#[tokio::test]
async fn the_post_owner_can_approve_a_comment() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Commented", "PUBLISHED").await;
    let comment_id = app.create_comment(&slug, "Nice post!").await;

    let res = app
        .patch_with_token(&routes::comment_approve(comment_id), &json!({}), &token)
        .await;
    assert_eq!(res.status, 200, "approve failed: {}", res.text);
    assert_eq!(res.body["approved"], true);

    let listed = app.get_without_token(&routes::post_comments(&slug)).await;
    let comments = listed.body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Nice post!");
}

#[tokio::test]
async fn only_the_post_owner_can_moderate() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "bob")
        .await;
    let slug = app.create_post_slug(&alice, "Commented", "PUBLISHED").await;
    let comment_id = app.create_comment(&slug, "Nice post!").await;

    let res = app
        .patch_with_token(&routes::comment_approve(comment_id), &json!({}), &bob)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");

    let res = app
        .delete_with_token(&routes::comment(comment_id), &bob)
        .await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn deleting_a_comment_promotes_its_replies_to_top_level() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Commented", "PUBLISHED").await;
    let parent_id = app.create_comment(&slug, "Parent comment").await;

    let reply = app
        .post_without_token(
            &routes::post_comments(&slug),
            &json!({
                "content": "A reply",
                "author_name": "Visitor",
                "author_email": "visitor@example.com",
                "parent_id": parent_id,
            }),
        )
        .await;
    assert_eq!(reply.status, 201);
    let reply_id = reply.id();

    let res = app
        .delete_with_token(&routes::comment(parent_id), &token)
        .await;
    assert_eq!(res.status, 200);

    let approved = app
        .patch_with_token(&routes::comment_approve(reply_id), &json!({}), &token)
        .await;
    assert_eq!(approved.status, 200);
    assert!(approved.body["parent_id"].is_null());
}

#[tokio::test]
async fn cannot_reply_to_a_comment_on_another_post() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let first = app.create_post_slug(&token, "First", "PUBLISHED").await;
    let second = app.create_post_slug(&token, "Second", "PUBLISHED").await;
    let parent_id = app.create_comment(&first, "On the first post").await;

    let res = app
        .post_without_token(
            &routes::post_comments(&second),
            &json!({
                "content": "Misplaced reply",
                "author_name": "Visitor",
                "author_email": "visitor@example.com",
                "parent_id": parent_id,
            }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn cannot_comment_on_a_draft_post() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Hidden Draft", "DRAFT").await;

    let res = app
        .post_without_token(
            &routes::post_comments(&slug),
            &json!({
                "content": "Sneaky comment",
                "author_name": "Visitor",
                "author_email": "visitor@example.com",
            }),
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn comment_validation_rejects_a_missing_email() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("alice@example.com", "alice")
        .await;
    let slug = app.create_post_slug(&token, "Commented", "PUBLISHED").await;

    let res = app
        .post_without_token(
            &routes::post_comments(&slug),
            &json!({
                "content": "No email here",
                "author_name": "Visitor",
                "author_email": "nope",
            }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
