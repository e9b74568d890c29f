//! Severity Inference Engine
//!
//! Loads a pre-trained tree-ensemble classifier once and answers severity
//! predictions for validated feature vectors.

mod engine;
mod forest;
mod model;

pub use engine::{ClassProbability, FeatureImportance, PredictionHandler, PredictionResult};
pub use forest::{DecisionTree, ForestClassifier};
pub use model::{SeverityLabel, SeverityModel};

use data_validator::ValidationError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}
