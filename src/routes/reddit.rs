// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reddit submission hand-off (requires a session key).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::routes::extract::JsonBody;
use crate::services::reddit::{is_valid_subreddit, submit_url};
use crate::AppState;
use axum::{extract::State, response::Redirect, routing::post, Extension, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Reddit routes. The session middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/post_to_reddit", post(post_to_reddit))
}

#[derive(Deserialize, Validate)]
struct SubmissionRequest {
    article: String,
    #[validate(length(min = 1, max = 300))]
    title: String,
    subreddit: String,
}

/// Redirect the caller to Reddit's submit page, pre-filled with the article.
async fn post_to_reddit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(submission): JsonBody<SubmissionRequest>,
) -> Result<Redirect> {
    submission.validate()?;

    let subreddit = submission.subreddit.trim();
    let subreddit = subreddit.strip_prefix("r/").unwrap_or(subreddit);
    if !is_valid_subreddit(subreddit) {
        return Err(AppError::BadRequest(format!(
            "Invalid subreddit name: {:?}",
            submission.subreddit
        )));
    }

    let url = submit_url(
        &state.config.reddit_base_url,
        subreddit,
        &submission.title,
        &submission.article,
    );

    tracing::info!(
        user_id = user.user_id,
        subreddit = %subreddit,
        "Redirecting to Reddit submit page"
    );

    Ok(Redirect::to(&url))
}
