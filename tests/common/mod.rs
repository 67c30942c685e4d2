#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use task_tracker_api::auth::{generate_jwt, Claims};
use task_tracker_api::database::models::User;
use task_tracker_api::state::AppState;

/// Fresh app state over an in-memory database. One connection max, so every
/// query sees the same memory-backed store.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");
    AppState::init(pool).await.expect("failed to init schema")
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (task_tracker_api::app(state.clone()), state)
}

pub fn token_for(user: &User) -> String {
    generate_jwt(Claims::new(user)).expect("failed to issue test token")
}

pub async fn register(state: &AppState, username: &str, email: &str, password: &str) -> User {
    state
        .user_service()
        .register(username, email, password)
        .await
        .expect("failed to register test user")
}

/// Registration only ever grants USER; tests needing an admin promote one.
pub async fn promote_to_admin(state: &AppState, user: &User) -> User {
    state
        .user_service()
        .add_role(user, "ADMIN")
        .await
        .expect("failed to grant ADMIN")
}

/// Drive one request through the router and decode the JSON body (Null for
/// empty bodies, e.g. 204).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
