//! Accidents per Hour of Day

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Serialize;

/// Layouts seen in `Start_Time`, tried in order
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a `Start_Time` value.
///
/// Offset timestamps keep their local wall-clock time, so the hour is the
/// hour at the accident location.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Accident counts for each hour of the day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HourlyCounts {
    /// Count per hour, index = hour (0-23)
    counts: [u64; 24],
    /// Records whose timestamp could not be parsed
    unparsed: u64,
}

impl HourlyCounts {
    /// Count a sequence of raw timestamps
    pub fn from_timestamps<'a>(timestamps: impl IntoIterator<Item = &'a str>) -> Self {
        let mut hourly = Self::default();
        for raw in timestamps {
            hourly.record(raw);
        }
        hourly
    }

    /// Count one raw timestamp
    pub fn record(&mut self, raw: &str) {
        match parse_start_time(raw) {
            Some(ts) => self.counts[ts.hour() as usize] += 1,
            None => self.unparsed += 1,
        }
    }

    /// Counts indexed by hour
    pub fn counts(&self) -> &[u64; 24] {
        &self.counts
    }

    /// Count for one hour
    pub fn at(&self, hour: u8) -> u64 {
        self.counts.get(hour as usize).copied().unwrap_or(0)
    }

    /// Timestamps that could not be parsed
    pub fn unparsed(&self) -> u64 {
        self.unparsed
    }

    /// Records counted in some hour
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Hour with the most accidents; the earliest wins ties
    pub fn peak_hour(&self) -> Option<u8> {
        let max = *self.counts.iter().max()?;
        if max == 0 {
            return None;
        }
        self.counts.iter().position(|&c| c == max).map(|h| h as u8)
    }
}
