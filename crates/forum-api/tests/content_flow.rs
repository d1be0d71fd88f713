mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;

use common::{app, create_comment, create_post, delete, get, post, register, send_request};

#[tokio::test]
async fn posts_list_newest_first() {
    let app = app();
    let alice = register(&app, "alice").await;

    let first = create_post(&app, &alice, "first").await;
    let second = create_post(&app, &alice, "second").await;

    let (status, body) = get(&app, "/api/posts").await;
    assert_eq!(status, StatusCode::OK);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], json!(second));
    assert_eq!(posts[1]["id"], json!(first));
    assert_eq!(posts[0]["authorUsername"], json!("alice"));
    assert!(posts[0]["createdOrder"].as_i64() > posts[1]["createdOrder"].as_i64());
}

#[tokio::test]
async fn single_post_lookup_answers_an_array() {
    let app = app();
    let alice = register(&app, "alice").await;
    let post_id = create_post(&app, &alice, "hello").await;

    let (status, body) = get(&app, &format!("/api/posts/{}", post_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], json!("hello"));

    let (status, body) = get(&app, "/api/posts/00000000-0000-4000-8000-000000000000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/api/posts/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn creating_content_requires_a_matching_token() {
    let app = app();
    let alice = register(&app, "alice").await;

    let (status, body) = post(&app, "/api/posts/add", None, json!({ "title": "t", "body": "b" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!(false));

    let (status, _) = post(
        &app,
        "/api/posts/add",
        Some(&alice),
        json!({ "username": "mallory", "title": "t", "body": "b" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        post(&app, "/api/posts/add", Some(&alice), json!({ "title": "   ", "body": "b" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_is_a_validation_error() {
    let app = app();
    let alice = register(&app, "alice").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/posts/add")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();

    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn comments_list_with_their_authors() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let post_id = create_post(&app, &alice, "thread").await;

    let older = create_comment(&app, &alice, &post_id, true).await;
    let newer = create_comment(&app, &bob, &post_id, true).await;
    // Replies are not listed under the post.
    create_comment(&app, &alice, &newer, false).await;

    let (status, body) = get(&app, &format!("/api/posts/comments/{}", post_id)).await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], json!(newer));
    assert_eq!(comments[1]["id"], json!(older));
    assert_eq!(body["commentUsernames"], json!(["bob", "alice"]));
}

#[tokio::test]
async fn commenting_on_a_missing_parent_is_not_found() {
    let app = app();
    let alice = register(&app, "alice").await;

    let (status, _) = post(
        &app,
        "/api/posts/comments/add",
        Some(&alice),
        json!({
            "parentId": "00000000-0000-4000-8000-000000000000",
            "parentIsPost": true,
            "body": "into the void",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_post_cascades_to_its_comments() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let post_id = create_post(&app, &alice, "doomed").await;
    let comment_id = create_comment(&app, &bob, &post_id, true).await;

    post(
        &app,
        "/api/reaction/add",
        Some(&bob),
        json!({ "commentId": comment_id, "kind": "heart" }),
    )
    .await;
    post(
        &app,
        "/api/votes/add",
        Some(&bob),
        json!({ "targetId": post_id, "type": "up" }),
    )
    .await;

    let (status, _) = delete(&app, &format!("/api/posts/del/{}", post_id), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = delete(&app, &format!("/api/posts/del/{}", post_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["id"], json!(post_id));
    assert_eq!(body["commentsDeleted"], json!(1));
    assert_eq!(body["reactionsDeleted"], json!(1));
    assert_eq!(body["votesDeleted"], json!(1));

    let (_, body) = get(&app, &format!("/api/posts/comments/{}", post_id)).await;
    assert_eq!(body["comments"], json!([]));
    let (_, body) = get(&app, &format!("/api/reaction/{}", comment_id)).await;
    assert_eq!(body, json!([]));
    let (_, body) = get(&app, &format!("/api/votes/posts/{}", post_id)).await;
    assert_eq!(body, json!({ "upvotes": [], "downvotes": [] }));

    // Running it again finds nothing left to remove.
    let (status, body) = delete(&app, &format!("/api/posts/del/{}", post_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"], json!(null));
    assert_eq!(body["commentsDeleted"], json!(0));
}

#[tokio::test]
async fn deleting_a_comment_twice_is_harmless() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let post_id = create_post(&app, &alice, "thread").await;
    let comment_id = create_comment(&app, &bob, &post_id, true).await;

    let (status, _) = delete(&app, &format!("/api/posts/comments/del/{}", comment_id), &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = delete(&app, &format!("/api/posts/comments/del/{}", comment_id), &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment"]["id"], json!(comment_id));

    let (status, body) = delete(&app, &format!("/api/posts/comments/del/{}", comment_id), &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "comment": null, "reactionsDeleted": 0 }));
}

#[tokio::test]
async fn deleting_a_post_by_comment_id_leaves_comment_votes() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let mallory = register(&app, "mallory").await;
    let post_id = create_post(&app, &alice, "thread").await;
    let comment_id = create_comment(&app, &alice, &post_id, true).await;

    for token in [&alice, &bob] {
        let (status, _) = post(
            &app,
            "/api/votes/add",
            Some(token),
            json!({ "targetId": comment_id, "targetKind": "comment", "type": "up" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = delete(&app, &format!("/api/posts/del/{}", comment_id), &mallory).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "post": null, "commentsDeleted": 0, "reactionsDeleted": 0, "votesDeleted": 0 })
    );

    let (_, body) = get(&app, &format!("/api/votes/comments/{}", comment_id)).await;
    assert_eq!(body["upvotes"].as_array().unwrap().len(), 2);
    let (_, body) = get(&app, &format!("/api/posts/comments/{}", post_id)).await;
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
}
