// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod classifier;
pub mod reddit;
pub mod session;

pub use classifier::{Classifier, ModelError, ModelLoader, NaiveBayesModel, ScoredLabel};
