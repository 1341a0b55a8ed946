// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostHere API Server
//!
//! Registers users, predicts the best subreddit for an article, and hands
//! authenticated users off to Reddit's submit page.

use posthere_api::{
    config::Config,
    db::Database,
    services::{Classifier, ModelLoader},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting PostHere API");

    // Connect to the database and create tables on first run
    let db = Database::connect_and_migrate(&config.database_url).await?;

    // Load the classifier once; it is shared read-only by all requests
    let model_source = config
        .model_source
        .clone()
        .ok_or("MODEL_PATH or MODEL_URL must be set")?;
    let model = ModelLoader::new().load(&model_source).await?;
    tracing::info!(
        labels = model.labels().len(),
        vocabulary = model.vocabulary_len(),
        "Classifier ready"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        classifier: Arc::new(model),
    });

    // Build router
    let app = posthere_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("posthere_api=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
