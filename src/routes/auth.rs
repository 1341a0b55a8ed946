// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login routes.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::routes::extract::JsonBody;
use crate::services::session::{generate_session_key, hash_password, verify_password};
use crate::AppState;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Username and password posted to `/register` and `/login`.
#[derive(Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(length(min = 1, max = 256))]
    password: String,
}

/// Response for a successful registration.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegisterResponse {
    pub session_key: String,
}

/// Create an account and issue its first session key.
async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<RegisterResponse>> {
    credentials.validate()?;

    if state.db.user_exists(&credentials.username).await? {
        tracing::info!(username = %credentials.username, "Registration for existing user");
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let iterations = state.config.password_hash_iterations;
    let password = credentials.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(anyhow::Error::from)?;

    let session_key = generate_session_key().map_err(anyhow::Error::from)?;

    let user = state
        .db
        .create_user(&credentials.username, &password_hash, &session_key)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Registered user");

    Ok(Json(RegisterResponse { session_key }))
}

/// Log in and rotate the session key. The new key is returned as plain text.
///
/// Every failure, including a malformed body or a storage error, produces
/// the same `login_failed` response.
async fn login(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<JsonBody<Credentials>, AppError>,
) -> Result<String> {
    let JsonBody(credentials) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        AppError::LoginFailed
    })?;

    match try_login(&state, credentials).await {
        Ok(Some(session_key)) => Ok(session_key),
        Ok(None) => Err(AppError::LoginFailed),
        Err(e) => {
            tracing::warn!(error = %e, "Login aborted by error");
            Err(AppError::LoginFailed)
        }
    }
}

/// Check credentials and issue a fresh session key. `Ok(None)` means the
/// username or password did not match.
async fn try_login(state: &AppState, credentials: Credentials) -> Result<Option<String>> {
    let Some(user) = state.db.find_user_by_username(&credentials.username).await? else {
        tracing::info!(username = %credentials.username, "Login for unknown user");
        return Ok(None);
    };

    let password = credentials.password;
    let password_hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(anyhow::Error::from)?;

    if !matches {
        tracing::info!(user_id = user.id, "Login with wrong password");
        return Ok(None);
    }

    let session_key = generate_session_key().map_err(anyhow::Error::from)?;
    let user = state.db.set_session_key(user, &session_key).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(Some(session_key))
}
