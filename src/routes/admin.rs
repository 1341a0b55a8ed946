// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative routes.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{extract::State, routing::get, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/reset", get(reset))
}

/// Drop and recreate the schema. Disabled when `ALLOW_RESET` is off.
async fn reset(State(state): State<Arc<AppState>>) -> Result<&'static str> {
    if !state.config.allow_reset {
        return Err(AppError::NotFound("/reset".to_string()));
    }

    state.db.reset_schema().await?;
    tracing::warn!("Database schema reset");

    Ok("reset.")
}
