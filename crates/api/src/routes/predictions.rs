//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use data_validator::{FormSchema, RawFeatures};
use inference_engine::PredictionResult;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Sentence shown under the predict button
    pub message: String,
}

/// Describe the input widgets
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<FormSchema> {
    Json(state.form.clone())
}

/// Predict the severity for one set of conditions
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawFeatures>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(raw) = payload?;

    let features = state
        .handler
        .validator()
        .validate_all(&raw)
        .map_err(ApiError::Validation)?;

    let result = state.handler.predict(&features)?;
    Ok(Json(PredictionResponse {
        message: format!("Severidad Predicha: {}", result.severity),
        result,
    }))
}
