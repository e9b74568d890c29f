//! Dataset Routes

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use dataset::{DatasetPreview, HourlyCounts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// Upper bound on preview rows per request
const MAX_PREVIEW_ROWS: usize = 100;

/// Query parameters for the preview endpoint
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Maximum number of rows, defaults to the configured preview size
    pub limit: Option<usize>,
}

/// Response for the preview endpoint
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: DatasetPreview,
    pub sample_size: usize,
}

/// Response for the hourly endpoint
#[derive(Debug, Serialize)]
pub struct HourlyResponse {
    #[serde(flatten)]
    pub hourly: HourlyCounts,
    pub total: u64,
    pub peak_hour: Option<u8>,
    pub sample_size: usize,
}

/// Response for the reload endpoint
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub path: String,
    pub sample_size: usize,
}

/// Get the first rows of the sample
pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Query(params) = query?;
    let limit = params
        .limit
        .unwrap_or(state.preview_rows)
        .min(MAX_PREVIEW_ROWS);
    let sample = state.dataset.read().await;

    Ok(Json(PreviewResponse {
        preview: sample.preview(limit),
        sample_size: sample.len(),
    }))
}

/// Get accident counts per hour of day
pub async fn get_hourly(State(state): State<Arc<AppState>>) -> Json<HourlyResponse> {
    let sample = state.dataset.read().await;
    let hourly = sample.hourly_counts();

    Json(HourlyResponse {
        total: hourly.total(),
        peak_hour: hourly.peak_hour(),
        sample_size: sample.len(),
        hourly,
    })
}

/// Re-read the dataset sample from disk
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, ApiError> {
    let current = state.dataset.read().await.clone();
    let fresh = tokio::task::spawn_blocking(move || current.reload())
        .await
        .map_err(|e| ApiError::Internal(format!("reload task failed: {}", e)))??;

    let response = ReloadResponse {
        path: fresh.path().display().to_string(),
        sample_size: fresh.len(),
    };
    info!("Dataset sample reloaded: {} rows", response.sample_size);
    *state.dataset.write().await = fresh;

    Ok(Json(response))
}
