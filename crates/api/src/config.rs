//! Dashboard Settings
//!
//! Layered from built-in defaults, an optional `config/dashboard.*` file and
//! `DASHBOARD__SECTION__KEY` environment variables, in that order.

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default settings file, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/dashboard";

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    pub bind_addr: String,
}

/// Model artifact settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Path to the exported classifier
    pub path: String,
}

/// Dataset sample settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    /// Path to the accident CSV
    pub path: String,
    /// Rows read from the top of the file
    pub sample_rows: usize,
    /// Rows shown in the preview table
    pub preview_rows: usize,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// All dashboard settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub dataset: DatasetSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from the default file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given file (any supported extension) and the environment
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:8080")?
            .set_default("model.path", "modelo_accidentes.json")?
            .set_default("dataset.path", "US_Accidents_March23.csv")?
            .set_default("dataset.sample_rows", 1000_i64)?
            .set_default("dataset.preview_rows", 5_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
