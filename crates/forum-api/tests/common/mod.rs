#![allow(dead_code)]

use std::time::Duration;

use argon2::Params;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use forum_api::identity::Identity;
use forum_api::{AppStateInner, routes};
use forum_db::Database;

pub const PASSWORD: &str = "correct horse battery";

/// Full router over an in-memory store, with the cheapest Argon2 parameters.
pub fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None).unwrap();
    let identity = Identity::new("integration-secret", chrono::Duration::hours(1)).with_hash_params(params);
    routes::router(AppStateInner::new(db, identity, Duration::from_secs(5)))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Sign up and sign in, returning the bearer token.
pub async fn register(app: &Router, username: &str) -> String {
    let (status, _) = post(
        app,
        "/api/auth/user/signup",
        None,
        json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        app,
        "/api/auth/user/signin",
        None,
        json!({ "username": username, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_post(app: &Router, token: &str, title: &str) -> String {
    let (status, body) = post(
        app,
        "/api/posts/add",
        Some(token),
        json!({ "title": title, "body": format!("{} body", title) }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["insertedId"].as_str().unwrap().to_string()
}

pub async fn create_comment(app: &Router, token: &str, parent_id: &str, on_post: bool) -> String {
    let (status, body) = post(
        app,
        "/api/posts/comments/add",
        Some(token),
        json!({ "parentId": parent_id, "parentIsPost": on_post, "body": "a comment" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["insertedId"].as_str().unwrap().to_string()
}
