// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use posthere_api::error::AppError;

async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (status, body) = body_json(AppError::Conflict("User already exists".to_string())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        serde_json::json!({ "error": "conflict", "details": "User already exists" })
    );

    let (status, body) = body_json(AppError::BadRequest("missing field".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "missing field");
}

#[tokio::test]
async fn test_unauthenticated_has_no_details() {
    let (status, body) = body_json(AppError::Unauthenticated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, serde_json::json!({ "error": "unauthenticated" }));
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, body) = body_json(AppError::Database("connection refused".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "database_error" }));

    let (status, body) = body_json(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "internal_error" }));
}

#[test]
fn test_db_errors_map_to_database() {
    let err: AppError = sea_orm::DbErr::Custom("nope".to_string()).into();
    assert_eq!(err.code(), "database_error");
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
