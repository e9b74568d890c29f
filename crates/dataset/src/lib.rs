//! Accident Dataset
//!
//! Reads a bounded sample of the accident CSV and derives the descriptive
//! aggregates the dashboard charts.

mod hourly;
mod sample;

pub use hourly::{parse_start_time, HourlyCounts};
pub use sample::{DatasetPreview, DatasetSample, START_TIME_COLUMN};

use thiserror::Error;

/// Dataset errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Cannot read dataset {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("Dataset is missing required column {0}")]
    MissingColumn(&'static str),
    #[error("Malformed record {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
}
