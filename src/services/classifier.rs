// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subreddit text classifier.
//!
//! The model is a multinomial naive Bayes classifier exported as JSON:
//!
//! ```json
//! {
//!   "labels": ["python", "rust"],
//!   "class_log_prior": [-0.69, -0.69],
//!   "vocabulary": {"borrow": 0, "snake": 1},
//!   "feature_log_prob": [[-2.3, -0.1], [-0.1, -2.3]]
//! }
//! ```
//!
//! It is loaded once at startup (from a file, or from a URL that may be
//! split into numbered chunks) and shared read-only by every request.

use crate::config::ModelSource;
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Chunks fetched at once when downloading a split model.
const MAX_CONCURRENT_FETCHES: usize = 4;

/// A label with its score. Higher is more likely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

/// Anything that can rank labels for a piece of text.
pub trait Classifier: Send + Sync {
    /// All labels the classifier can produce, in model order.
    fn labels(&self) -> &[String];

    /// Every label scored against `text`, best first.
    ///
    /// Must be deterministic; equal scores keep model order.
    fn rank(&self, text: &str) -> Vec<ScoredLabel>;

    /// The single best label for `text`.
    fn predict(&self, text: &str) -> String {
        self.rank(text)
            .into_iter()
            .next()
            .map(|s| s.label)
            .unwrap_or_default()
    }
}

/// On-disk model format.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ModelFile {
    labels: Vec<String>,
    class_log_prior: Vec<f64>,
    vocabulary: HashMap<String, usize>,
    feature_log_prob: Vec<Vec<f64>>,
}

/// Multinomial naive Bayes over word counts.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    labels: Vec<String>,
    class_log_prior: Vec<f64>,
    vocabulary: HashMap<String, usize>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    /// Load a model from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let bytes = fs::read(path.as_ref()).map_err(|e| ModelError::Io(e.to_string()))?;
        Self::load_from_slice(&bytes)
    }

    /// Load a model from raw JSON bytes.
    pub fn load_from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let file: ModelFile =
            serde_json::from_slice(bytes).map_err(|e| ModelError::Parse(e.to_string()))?;
        Self::from_parts(file)
    }

    /// Load a model from a JSON string.
    pub fn load_from_json(json: &str) -> Result<Self, ModelError> {
        Self::load_from_slice(json.as_bytes())
    }

    fn from_parts(file: ModelFile) -> Result<Self, ModelError> {
        let n_labels = file.labels.len();
        let n_features = file.vocabulary.len();

        if n_labels == 0 {
            return Err(ModelError::Invalid("model has no labels".to_string()));
        }
        if file.class_log_prior.len() != n_labels {
            return Err(ModelError::Invalid(format!(
                "class_log_prior has {} entries, expected {}",
                file.class_log_prior.len(),
                n_labels
            )));
        }
        if file.feature_log_prob.len() != n_labels {
            return Err(ModelError::Invalid(format!(
                "feature_log_prob has {} rows, expected {}",
                file.feature_log_prob.len(),
                n_labels
            )));
        }
        for (row, label) in file.feature_log_prob.iter().zip(&file.labels) {
            if row.len() != n_features {
                return Err(ModelError::Invalid(format!(
                    "feature_log_prob row for {:?} has {} entries, expected {}",
                    label,
                    row.len(),
                    n_features
                )));
            }
        }
        if let Some((word, idx)) = file.vocabulary.iter().find(|(_, &idx)| idx >= n_features) {
            return Err(ModelError::Invalid(format!(
                "vocabulary index {} for {:?} out of range",
                idx, word
            )));
        }
        let all_finite = file.class_log_prior.iter().all(|v| v.is_finite())
            && file.feature_log_prob.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::Invalid("non-finite probability".to_string()));
        }

        tracing::info!(
            labels = n_labels,
            vocabulary = n_features,
            "Loaded classifier model"
        );

        Ok(Self {
            labels: file.labels,
            class_log_prior: file.class_log_prior,
            vocabulary: file.vocabulary,
            feature_log_prob: file.feature_log_prob,
        })
    }

    /// Number of words the model knows.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Classifier for NaiveBayesModel {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn rank(&self, text: &str) -> Vec<ScoredLabel> {
        // Ordered by feature index so every call sums in the same order.
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut scored: Vec<ScoredLabel> = self
            .labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let likelihood: f64 = counts
                    .iter()
                    .map(|(&idx, &count)| count * self.feature_log_prob[c][idx])
                    .sum();
                ScoredLabel {
                    label: label.clone(),
                    score: self.class_log_prior[c] + likelihood,
                }
            })
            .collect();

        // Stable sort keeps model order for ties.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

/// Split text into lowercase word tokens of two or more characters.
///
/// A word is a run of alphanumeric characters or underscores, which is the
/// same rule scikit-learn's default `CountVectorizer` applies.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Fetches and parses the model from its configured source.
#[derive(Clone)]
pub struct ModelLoader {
    http: reqwest::Client,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Load the model from `source`.
    pub async fn load(&self, source: &ModelSource) -> Result<NaiveBayesModel, ModelError> {
        match source {
            ModelSource::File(path) => {
                tracing::info!(path = %path.display(), "Loading classifier model from file");
                NaiveBayesModel::load_from_file(path)
            }
            ModelSource::Url { url, parts } => {
                let bytes = self.fetch(url, *parts).await?;
                NaiveBayesModel::load_from_slice(&bytes)
            }
        }
    }

    /// Download the model bytes. A `{}` in `url` marks a split model whose
    /// chunks `0..parts` are fetched and concatenated in order.
    pub async fn fetch(&self, url: &str, parts: u32) -> Result<Vec<u8>, ModelError> {
        if !url.contains("{}") {
            tracing::info!(url = %url, "Fetching classifier model");
            return self.fetch_one(url.to_string()).await;
        }

        if parts == 0 {
            return Err(ModelError::Invalid(
                "split model URL needs at least one part".to_string(),
            ));
        }

        tracing::info!(url = %url, parts, "Fetching split classifier model");

        let chunks: Vec<Vec<u8>> = stream::iter(0..parts)
            .map(|i| self.fetch_one(url.replace("{}", &i.to_string())))
            .buffered(MAX_CONCURRENT_FETCHES)
            .try_collect()
            .await?;

        Ok(chunks.concat())
    }

    async fn fetch_one(&self, url: String) -> Result<Vec<u8>, ModelError> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ModelError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Fetch(format!("{}: HTTP {}", url, status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ModelError::Fetch(format!("{}: {}", url, e)))?;

        tracing::debug!(url = %url, len = bytes.len(), "Fetched model chunk");
        Ok(bytes.to_vec())
    }
}

/// Errors from loading a classifier model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(String),

    #[error("Failed to fetch model: {0}")]
    Fetch(String),

    #[error("Failed to parse model: {0}")]
    Parse(String),

    #[error("Invalid model: {0}")]
    Invalid(String),
}
