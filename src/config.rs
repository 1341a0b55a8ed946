// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;

/// Default number of chunks a templated model URL is split into.
pub const DEFAULT_MODEL_PARTS: u32 = 34;

/// Default PBKDF2 rounds for stored passwords.
pub const DEFAULT_PASSWORD_HASH_ITERATIONS: u32 = 100_000;

/// Where the classifier model is loaded from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Local JSON file.
    File(PathBuf),
    /// Remote URL. A `{}` in the URL is replaced by the chunk index
    /// `0..parts` and the chunks are concatenated in order.
    Url { url: String, parts: u32 },
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection string (`sqlite:...` or `postgres://...`)
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Classifier model location
    pub model_source: Option<ModelSource>,
    /// Base URL for Reddit submit redirects
    pub reddit_base_url: String,
    /// Whether `GET /reset` may drop and recreate the schema
    pub allow_reset: bool,
    /// PBKDF2 rounds used when hashing new passwords
    pub password_hash_iterations: u32,
}

impl Config {
    /// Config for tests: in-memory SQLite and cheap password hashing.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            model_source: None,
            reddit_base_url: "https://www.reddit.com".to_string(),
            allow_reset: true,
            password_hash_iterations: 1_000,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let model_source = if let Ok(path) = env::var("MODEL_PATH") {
            Some(ModelSource::File(PathBuf::from(path.trim())))
        } else if let Ok(url) = env::var("MODEL_URL") {
            let parts = match env::var("MODEL_PARTS") {
                Ok(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("MODEL_PARTS", raw))?,
                Err(_) => DEFAULT_MODEL_PARTS,
            };
            Some(ModelSource::Url {
                url: url.trim().to_string(),
                parts,
            })
        } else {
            None
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            model_source,
            reddit_base_url: env::var("REDDIT_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://www.reddit.com".to_string()),
            allow_reset: env::var("ALLOW_RESET")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            password_hash_iterations: env::var("PASSWORD_HASH_ITERATIONS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PASSWORD_HASH_ITERATIONS),
        })
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
