//! Validation Error Types

use feature_engine::OutOfDomain;
use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Name of the offending field, when known
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::OutOfRange { field, .. } => Some(field),
            ValidationError::MissingField(field) => Some(field),
            ValidationError::InvalidFormat(_) => None,
        }
    }
}

impl From<OutOfDomain> for ValidationError {
    fn from(e: OutOfDomain) -> Self {
        ValidationError::OutOfRange {
            field: e.field,
            value: e.value,
            min: e.min,
            max: e.max,
        }
    }
}
