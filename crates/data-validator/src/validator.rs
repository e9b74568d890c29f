//! Feature Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::{DayOfWeek, FeatureVector, FEATURE_DIMENSION, FEATURE_DOMAIN};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Day of week as submitted: either the model index or the display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayInput {
    Index(i64),
    Name(String),
}

impl From<DayOfWeek> for DayInput {
    fn from(day: DayOfWeek) -> Self {
        DayInput::Name(day.name().to_string())
    }
}

/// Raw prediction input, every field optional until validated.
///
/// Field names match `FeatureVector`; the model column names are accepted
/// as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatures {
    #[serde(default)]
    pub hour: Option<f64>,
    #[serde(default)]
    pub day_of_week: Option<DayInput>,
    #[serde(default, alias = "Temperature(F)")]
    pub temperature_f: Option<f64>,
    #[serde(default, alias = "Humidity(%)")]
    pub humidity_pct: Option<f64>,
    #[serde(default, alias = "Visibility(mi)")]
    pub visibility_mi: Option<f64>,
    #[serde(default, alias = "Wind_Speed(mph)")]
    pub wind_speed_mph: Option<f64>,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Hour of day valid range
    pub hour_range: (f64, f64),
    /// Temperature valid range (°F)
    pub temperature_range: (f64, f64),
    /// Humidity valid range (%)
    pub humidity_range: (f64, f64),
    /// Visibility valid range (mi)
    pub visibility_range: (f64, f64),
    /// Wind speed valid range (mph)
    pub wind_speed_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            hour_range: FEATURE_DOMAIN[0],
            temperature_range: FEATURE_DOMAIN[2],
            humidity_range: FEATURE_DOMAIN[3],
            visibility_range: FEATURE_DOMAIN[4],
            wind_speed_range: FEATURE_DOMAIN[5],
        }
    }
}

/// Result of checking every field at once
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Validator for prediction input
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against a range (inclusive)
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate hour of day
    pub fn validate_hour(&self, hour: Option<f64>) -> Result<u8, ValidationError> {
        let hour = require_finite("hour", hour)?;
        if hour.fract() != 0.0 {
            return Err(ValidationError::InvalidFormat(format!(
                "hour must be a whole number, got {}",
                hour
            )));
        }
        self.validate_range("hour", hour, self.config.hour_range)?;
        Ok(hour as u8)
    }

    /// Validate day of week, given as index or display name
    pub fn validate_day(&self, day: Option<&DayInput>) -> Result<DayOfWeek, ValidationError> {
        match day.ok_or(ValidationError::MissingField("day_of_week"))? {
            DayInput::Index(index) => u8::try_from(*index)
                .ok()
                .and_then(DayOfWeek::from_index)
                .ok_or(ValidationError::OutOfRange {
                    field: "day_of_week",
                    value: *index as f64,
                    min: 0.0,
                    max: (DayOfWeek::ALL.len() - 1) as f64,
                }),
            DayInput::Name(name) => name
                .parse::<DayOfWeek>()
                .map_err(|e| ValidationError::InvalidFormat(e.to_string())),
        }
    }

    /// Validate temperature
    pub fn validate_temperature(&self, value: Option<f64>) -> Result<f64, ValidationError> {
        self.validate_measure("temperature_f", value, self.config.temperature_range)
    }

    /// Validate humidity
    pub fn validate_humidity(&self, value: Option<f64>) -> Result<f64, ValidationError> {
        self.validate_measure("humidity_pct", value, self.config.humidity_range)
    }

    /// Validate visibility
    pub fn validate_visibility(&self, value: Option<f64>) -> Result<f64, ValidationError> {
        self.validate_measure("visibility_mi", value, self.config.visibility_range)
    }

    /// Validate wind speed
    pub fn validate_wind_speed(&self, value: Option<f64>) -> Result<f64, ValidationError> {
        self.validate_measure("wind_speed_mph", value, self.config.wind_speed_range)
    }

    /// Validate raw input, reporting the first error
    pub fn validate(&self, raw: &RawFeatures) -> Result<FeatureVector, ValidationError> {
        self.validate_all(raw).map_err(|mut errors| errors.swap_remove(0))
    }

    /// Validate raw input, reporting every offending field in field order
    pub fn validate_all(&self, raw: &RawFeatures) -> Result<FeatureVector, Vec<ValidationError>> {
        let fields = (
            self.validate_hour(raw.hour),
            self.validate_day(raw.day_of_week.as_ref()),
            self.validate_temperature(raw.temperature_f),
            self.validate_humidity(raw.humidity_pct),
            self.validate_visibility(raw.visibility_mi),
            self.validate_wind_speed(raw.wind_speed_mph),
        );

        match fields {
            (Ok(hour), Ok(day), Ok(temperature), Ok(humidity), Ok(visibility), Ok(wind)) => {
                let features =
                    FeatureVector::new(hour, day, temperature, humidity, visibility, wind)
                        .map_err(|e| vec![ValidationError::from(e)])?;
                trace!("Validated feature vector: {:?}", features);
                Ok(features)
            }
            (hour, day, temperature, humidity, visibility, wind) => Err([
                hour.err(),
                day.err(),
                temperature.err(),
                humidity.err(),
                visibility.err(),
                wind.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }

    /// Check every field and collect all errors
    pub fn check(&self, raw: &RawFeatures) -> ValidationResult {
        match self.validate_all(raw) {
            Ok(_) => ValidationResult::valid(FEATURE_DIMENSION),
            Err(errors) => ValidationResult::invalid(errors, FEATURE_DIMENSION),
        }
    }

    fn validate_measure(
        &self,
        field: &'static str,
        value: Option<f64>,
        range: (f64, f64),
    ) -> Result<f64, ValidationError> {
        let value = require_finite(field, value)?;
        self.validate_range(field, value, range)?;
        Ok(value)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

fn require_finite(field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat(format!(
            "{} must be a finite number",
            field
        )));
    }
    Ok(value)
}
