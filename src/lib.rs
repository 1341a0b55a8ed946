// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PostHere API: register, log in, and find the right subreddit
//!
//! This crate provides the HTTP backend that classifies an article into a
//! subreddit and hands authenticated users off to Reddit's submit page.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::Classifier;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub classifier: Arc<dyn Classifier>,
}
