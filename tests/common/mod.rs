// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use posthere_api::config::Config;
use posthere_api::db::Database;
use posthere_api::routes::create_router;
use posthere_api::services::NaiveBayesModel;
use posthere_api::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Model shipped with the repository.
#[allow(dead_code)]
pub const SAMPLE_MODEL_PATH: &str = "data/sample_model.json";

/// Load the sample classifier model.
#[allow(dead_code)]
pub fn sample_model() -> NaiveBayesModel {
    NaiveBayesModel::load_from_file(SAMPLE_MODEL_PATH)
        .expect("Failed to load sample model - is data/ committed?")
}

/// Create a test app backed by in-memory SQLite and the sample model.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default()).await
}

/// Same as `create_test_app` with a custom config.
#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = Database::connect_and_migrate(&config.database_url)
        .await
        .expect("Failed to open in-memory database");

    let state = Arc::new(AppState {
        config,
        db,
        classifier: Arc::new(sample_model()),
    });

    (create_router(state.clone()), state)
}

/// Response parts collected for assertions.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("Body is not JSON ({}): {}", e, self.body))
    }
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// POST a JSON body, optionally with an `Authorization` header.
#[allow(dead_code)]
pub async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
    authorization: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Register a user and return the issued session key.
#[allow(dead_code)]
pub async fn register(app: &axum::Router, username: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/register",
        serde_json::json!({ "username": username, "password": password }),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "register: {}", response.body);

    response.json()["session_key"]
        .as_str()
        .expect("session_key in register response")
        .to_string()
}

/// Log in; on success the body is the plain-text session key.
#[allow(dead_code)]
pub async fn login(app: &axum::Router, username: &str, password: &str) -> TestResponse {
    post_json(
        app,
        "/login",
        serde_json::json!({ "username": username, "password": password }),
        None,
    )
    .await
}
