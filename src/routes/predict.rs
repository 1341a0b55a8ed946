// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subreddit prediction route.

use crate::error::Result;
use crate::routes::extract::JsonBody;
use crate::services::classifier::ScoredLabel;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/predict", post(predict))
}

#[derive(Deserialize)]
struct PredictRequest {
    article: String,
    /// When set, also return this many ranked labels.
    #[serde(default)]
    return_count: Option<usize>,
}

/// Prediction response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictResponse {
    pub prediction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<ScoredLabel>>,
}

/// Classify an article into a subreddit.
async fn predict(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    let ranked = state.classifier.rank(&request.article);
    let prediction = ranked
        .first()
        .map(|s| s.label.clone())
        .unwrap_or_default();

    let predictions = request.return_count.map(|count| {
        let count = count.clamp(1, ranked.len().max(1));
        ranked.into_iter().take(count).collect::<Vec<_>>()
    });

    tracing::debug!(
        prediction = %prediction,
        article_len = request.article.len(),
        "Classified article"
    );

    Ok(Json(PredictResponse {
        prediction,
        predictions,
    }))
}
