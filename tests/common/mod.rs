//! Shared helpers for integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

use movie_api::config::Config;
use movie_api::{create_router, AppState, Stores, TokenMaker};

pub const TEST_KEY: &str = "integration-test-signing-key-0123456789";
pub const USER_AGENT: &str = "movie-api-tests/1.0";
pub const CLIENT_IP: &str = "10.1.2.3";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_key = TEST_KEY.to_string();
    config.auth.bcrypt_cost = 4;
    config
}

pub fn token_maker() -> Arc<TokenMaker> {
    Arc::new(TokenMaker::new(TEST_KEY).expect("test key is long enough"))
}

/// Router over the given stores
pub fn app_with(stores: Stores) -> Router {
    let config = test_config();
    create_router(AppState::new(&config, stores, token_maker()))
}

/// Router over fresh in-memory stores
pub fn app() -> Router {
    app_with(Stores::in_memory())
}

/// Send one request and decode the JSON response
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("user-agent", USER_AGENT)
        .header("x-real-ip", CLIENT_IP);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn register(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "full_name": format!("{} Tester", username),
            "username": username,
            "email": email,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

pub async fn login(app: &Router, username: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body
}

/// Register and log in, returning the access token
pub async fn signed_in(app: &Router, username: &str) -> String {
    register(app, username, &format!("{}@example.com", username), "pw123456").await;
    let auth = login(app, username, "pw123456").await;
    auth["access_token"].as_str().unwrap().to_string()
}
