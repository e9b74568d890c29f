//! API Error Responses

use crate::charts::ChartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::ValidationError;
use dataset::DatasetError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error("Malformed request: {0}")]
    Malformed(String),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors that abort startup before the server accepts requests
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Model(#[from] InferenceError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_)
            | ApiError::Malformed(_)
            | ApiError::Inference(InferenceError::InvalidInput(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
            }
            ApiError::Inference(InferenceError::ModelUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
            }
            ApiError::Inference(InferenceError::InferenceFailed(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "inference_failed")
            }
            ApiError::Dataset(_) => (StatusCode::INTERNAL_SERVER_ERROR, "dataset_unavailable"),
            ApiError::Chart(_) => (StatusCode::INTERNAL_SERVER_ERROR, "chart_failed"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let details = match &self {
            ApiError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: code,
            message: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_422() {
        let err = ApiError::Validation(vec![
            ValidationError::MissingField("hour"),
            ValidationError::MissingField("humidity_pct"),
        ]);
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.to_string(),
            "Missing required field: hour; Missing required field: humidity_pct"
        );
    }

    #[test]
    fn test_model_unavailable_maps_to_503() {
        let err = ApiError::from(InferenceError::ModelUnavailable("gone".to_string()));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
        );
    }

    #[test]
    fn test_invalid_input_maps_to_422() {
        let err = ApiError::from(InferenceError::InvalidInput(ValidationError::MissingField(
            "hour",
        )));
        assert_eq!(err.status_and_code().1, "invalid_input");
    }

    #[test]
    fn test_malformed_request_maps_to_422() {
        let err = ApiError::Malformed("expected value at line 1 column 10".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
        );
    }
}
