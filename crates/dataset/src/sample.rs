//! Dataset Sample

use crate::hourly::HourlyCounts;
use crate::DatasetError;
use csv::StringRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column holding the accident start timestamp
pub const START_TIME_COLUMN: &str = "Start_Time";

/// First rows of the sample, as shown in the data table
#[derive(Debug, Clone, Serialize)]
pub struct DatasetPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The first `sample_rows` records of the accident CSV, read once
#[derive(Debug, Clone)]
pub struct DatasetSample {
    /// Source file
    path: PathBuf,
    /// Row limit used when reading
    sample_rows: usize,
    /// Header row
    columns: Vec<String>,
    /// Sampled records
    records: Vec<StringRecord>,
    /// Position of `Start_Time` in each record
    start_time_idx: usize,
}

impl DatasetSample {
    /// Read the header and at most `sample_rows` records.
    ///
    /// Short records are kept with their missing trailing cells empty; a
    /// record longer than the header is rejected.
    pub fn load(path: impl AsRef<Path>, sample_rows: usize) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let unreadable = |reason: String| DatasetError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| unreadable(e.to_string()))?;
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| unreadable(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let start_time_idx = columns
            .iter()
            .position(|c| c == START_TIME_COLUMN)
            .ok_or(DatasetError::MissingColumn(START_TIME_COLUMN))?;

        let mut records = Vec::with_capacity(sample_rows.min(10_000));
        for result in reader.records().take(sample_rows) {
            let record = result.map_err(|e| DatasetError::MalformedRecord {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: e.to_string(),
            })?;
            if record.len() > columns.len() {
                return Err(DatasetError::MalformedRecord {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    reason: format!(
                        "found {} fields, header has {}",
                        record.len(),
                        columns.len()
                    ),
                });
            }
            records.push(record);
        }

        info!(
            "Loaded dataset sample from {}: {} rows, {} columns",
            path.display(),
            records.len(),
            columns.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            sample_rows,
            columns,
            records,
            start_time_idx,
        })
    }

    /// Read the file again with the same row limit
    pub fn reload(&self) -> Result<Self, DatasetError> {
        debug!("Reloading dataset sample from {}", self.path.display());
        Self::load(&self.path, self.sample_rows)
    }

    /// Source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header row
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of sampled records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the sample holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `limit` records, padded to the header width
    pub fn preview(&self, limit: usize) -> DatasetPreview {
        let width = self.columns.len();
        DatasetPreview {
            columns: self.columns.clone(),
            rows: self
                .records
                .iter()
                .take(limit)
                .map(|r| {
                    (0..width)
                        .map(|i| r.get(i).unwrap_or_default().to_string())
                        .collect()
                })
                .collect(),
        }
    }

    /// `Start_Time` values of the sampled records
    pub fn start_times(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .map(move |r| r.get(self.start_time_idx).unwrap_or(""))
    }

    /// Accidents per hour of day across the sample
    pub fn hourly_counts(&self) -> HourlyCounts {
        HourlyCounts::from_timestamps(self.start_times())
    }
}
