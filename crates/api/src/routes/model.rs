//! Model Routes

use axum::{extract::State, Json};
use inference_engine::{FeatureImportance, SeverityLabel};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Response for the importances endpoint
#[derive(Debug, Serialize)]
pub struct ImportanceResponse {
    pub data: Vec<FeatureImportance>,
    pub labels: Vec<SeverityLabel>,
}

/// Get feature importances
pub async fn get_importances(State(state): State<Arc<AppState>>) -> Json<ImportanceResponse> {
    Json(ImportanceResponse {
        data: state.handler.feature_importances(),
        labels: state.handler.labels().to_vec(),
    })
}
