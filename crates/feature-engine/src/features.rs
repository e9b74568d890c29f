//! Feature Vector Assembly

use crate::day::DayOfWeek;
use serde::Serialize;
use thiserror::Error;

/// Number of features the severity model consumes
pub const FEATURE_DIMENSION: usize = 6;

/// Model column names, in the order the model was trained on
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "hour",
    "day_of_week",
    "Temperature(F)",
    "Humidity(%)",
    "Visibility(mi)",
    "Wind_Speed(mph)",
];

/// `FeatureVector` field names, in `FEATURE_COLUMNS` order
pub const FEATURE_FIELDS: [&str; FEATURE_DIMENSION] = [
    "hour",
    "day_of_week",
    "temperature_f",
    "humidity_pct",
    "visibility_mi",
    "wind_speed_mph",
];

/// Inclusive domain of each feature, in `FEATURE_COLUMNS` order
pub const FEATURE_DOMAIN: [(f64, f64); FEATURE_DIMENSION] = [
    (0.0, 23.0),
    (0.0, 6.0),
    (-20.0, 120.0),
    (0.0, 100.0),
    (0.0, 50.0),
    (0.0, 100.0),
];

/// A value outside the domain the model was trained on
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} value {value} is outside the model domain [{min}, {max}]")]
pub struct OutOfDomain {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Conditions for which a severity prediction is requested.
///
/// Built once per request and never mutated. Every value is finite and
/// inside `FEATURE_DOMAIN`; raw user input goes through
/// `data_validator::Validator`, which reports all offending fields at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    hour: u8,
    day_of_week: DayOfWeek,
    temperature_f: f64,
    humidity_pct: f64,
    visibility_mi: f64,
    wind_speed_mph: f64,
}

impl FeatureVector {
    /// Assemble a feature vector, rejecting the first value outside `FEATURE_DOMAIN`
    pub fn new(
        hour: u8,
        day_of_week: DayOfWeek,
        temperature_f: f64,
        humidity_pct: f64,
        visibility_mi: f64,
        wind_speed_mph: f64,
    ) -> Result<Self, OutOfDomain> {
        let features = Self {
            hour,
            day_of_week,
            temperature_f,
            humidity_pct,
            visibility_mi,
            wind_speed_mph,
        };

        let row = features.as_row();
        for (i, &value) in row.iter().enumerate() {
            let (min, max) = FEATURE_DOMAIN[i];
            if !(min..=max).contains(&value) {
                return Err(OutOfDomain {
                    field: FEATURE_FIELDS[i],
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(features)
    }

    /// Hour of the day (0-23)
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Day of the week
    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    /// Temperature (°F)
    pub fn temperature_f(&self) -> f64 {
        self.temperature_f
    }

    /// Relative humidity (%)
    pub fn humidity_pct(&self) -> f64 {
        self.humidity_pct
    }

    /// Visibility (miles)
    pub fn visibility_mi(&self) -> f64 {
        self.visibility_mi
    }

    /// Wind speed (mph)
    pub fn wind_speed_mph(&self) -> f64 {
        self.wind_speed_mph
    }

    /// Model input row, ordered as `FEATURE_COLUMNS`
    pub fn as_row(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.hour as f64,
            self.day_of_week.index() as f64,
            self.temperature_f,
            self.humidity_pct,
            self.visibility_mi,
            self.wind_speed_mph,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_follows_column_order() {
        let features = FeatureVector::new(17, DayOfWeek::Friday, 68.5, 40.0, 9.0, 12.0).unwrap();
        assert_eq!(features.as_row(), [17.0, 4.0, 68.5, 40.0, 9.0, 12.0]);
        assert_eq!(features.as_row().len(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn test_serialized_field_names() {
        let features = FeatureVector::new(0, DayOfWeek::Monday, -20.0, 0.0, 0.0, 0.0).unwrap();
        let json = serde_json::to_value(features).unwrap();
        assert_eq!(json["hour"], 0);
        assert_eq!(json["day_of_week"], 0);
        assert_eq!(json["temperature_f"], -20.0);
        assert_eq!(json["wind_speed_mph"], 0.0);
    }

    #[test]
    fn test_domain_bounds_are_inclusive() {
        assert!(FeatureVector::new(0, DayOfWeek::Monday, -20.0, 0.0, 0.0, 0.0).is_ok());
        assert!(FeatureVector::new(23, DayOfWeek::Sunday, 120.0, 100.0, 50.0, 100.0).is_ok());
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let err = FeatureVector::new(24, DayOfWeek::Monday, 70.0, 50.0, 10.0, 5.0).unwrap_err();
        assert_eq!(err.field, "hour");
        assert_eq!(err.max, 23.0);

        let err = FeatureVector::new(12, DayOfWeek::Monday, 70.0, 100.5, 10.0, 5.0).unwrap_err();
        assert_eq!(err.field, "humidity_pct");
        assert_eq!(err.value, 100.5);
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = FeatureVector::new(12, DayOfWeek::Monday, f64::NAN, 50.0, 10.0, 5.0).unwrap_err();
        assert_eq!(err.field, "temperature_f");
        assert!(FeatureVector::new(12, DayOfWeek::Monday, 70.0, 50.0, f64::INFINITY, 5.0).is_err());
    }
}
