//! Chart Routes

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::charts::{feature_importance_svg, hourly_svg};
use crate::error::ApiError;
use crate::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Feature importance chart
pub async fn get_importances_svg(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let svg = feature_importance_svg(&state.handler.feature_importances())?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}

/// Hourly accident chart
pub async fn get_hourly_svg(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let hourly = state.dataset.read().await.hourly_counts();
    let svg = hourly_svg(&hourly)?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}
