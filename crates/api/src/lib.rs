//! Accident Severity Dashboard API
//!
//! REST API for the severity dashboard: the input form, predictions, the
//! model's feature importances, the dataset sample and both charts.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod charts;
pub mod config;
pub mod error;
mod routes;

use crate::config::{LoggingSettings, Settings};
use data_validator::{FormSchema, Validator};
use dataset::DatasetSample;
use error::StartupError;
use inference_engine::PredictionHandler;

/// Application state shared across handlers, built once at startup
pub struct AppState {
    /// Model-backed prediction handler
    pub handler: PredictionHandler,
    /// Input widgets
    pub form: FormSchema,
    /// Dataset sample, replaced only by an explicit reload
    pub dataset: RwLock<DatasetSample>,
    /// Default preview size
    pub preview_rows: usize,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state from loaded dependencies
    pub fn new(handler: PredictionHandler, dataset: DatasetSample, preview_rows: usize) -> Self {
        let form = FormSchema::from_config(handler.validator().config());
        Self {
            handler,
            form,
            dataset: RwLock::new(dataset),
            preview_rows,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Load the model, then the dataset sample.
    ///
    /// A missing or corrupt model fails with `ModelUnavailable` before
    /// anything else is touched.
    pub fn load(settings: &Settings) -> Result<Self, StartupError> {
        let handler = PredictionHandler::from_path(&settings.model.path, Validator::default())?;
        let dataset = DatasetSample::load(&settings.dataset.path, settings.dataset.sample_rows)?;
        Ok(Self::new(handler, dataset, settings.dataset.preview_rows))
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub model: ModelHealth,
    pub dataset: DatasetHealth,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub status: String,
    pub label_count: usize,
}

/// Loaded dataset summary
#[derive(Debug, Serialize)]
pub struct DatasetHealth {
    pub status: String,
    pub path: String,
    pub rows: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/form", get(routes::predictions::get_form))
        .route("/api/v1/predict", post(routes::predictions::predict))
        .route("/api/v1/model/importances", get(routes::model::get_importances))
        .route("/api/v1/dataset/preview", get(routes::dataset::get_preview))
        .route("/api/v1/dataset/hourly", get(routes::dataset::get_hourly))
        .route("/api/v1/dataset/reload", post(routes::dataset::reload))
        .route(
            "/api/v1/charts/importances.svg",
            get(routes::charts::get_importances_svg),
        )
        .route("/api/v1/charts/hourly.svg", get(routes::charts::get_hourly_svg))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let dataset = state.dataset.read().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            model: ModelHealth {
                status: "ok".to_string(),
                label_count: state.handler.labels().len(),
            },
            dataset: DatasetHealth {
                status: if dataset.is_empty() { "empty" } else { "ok" }.to_string(),
                path: dataset.path().display().to_string(),
                rows: dataset.len(),
            },
        },
    })
}

/// Log filter: `RUST_LOG` when set, otherwise the configured level
pub fn log_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Initialize logging. Returns false when a subscriber was already
/// installed, which is then kept.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(settings))
        .with_target(true);

    let installed = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
    installed.is_ok()
}

/// Load all dependencies, then serve until shutdown
pub async fn run_server(settings: Settings) -> Result<(), StartupError> {
    let state = Arc::new(AppState::load(&settings)?);
    let app = create_router(state);

    info!("Starting API server on {}", settings.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
