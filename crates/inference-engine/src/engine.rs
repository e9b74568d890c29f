//! Prediction Request Handler

use crate::forest::ForestClassifier;
use crate::model::{argmax, SeverityLabel, SeverityModel};
use crate::InferenceError;
use data_validator::{RawFeatures, Validator};
use feature_engine::{FeatureVector, FEATURE_COLUMNS};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, trace};

/// Probability assigned to one severity label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label: SeverityLabel,
    pub probability: f64,
}

/// Prediction result for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted severity
    pub severity: SeverityLabel,
    /// Probability of the predicted severity (0.0 to 1.0)
    pub confidence: f64,
    /// Probabilities for each label, in model order
    pub probabilities: Vec<ClassProbability>,
    /// The input the prediction was made for
    pub features: FeatureVector,
}

/// Importance of one model column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

/// Answers severity predictions with a model loaded once at startup
#[derive(Clone)]
pub struct PredictionHandler {
    /// Trained classifier
    model: Arc<dyn SeverityModel>,
    /// Input domain checks
    validator: Validator,
}

impl PredictionHandler {
    /// Create a handler around an already loaded model
    pub fn new(model: Arc<dyn SeverityModel>, validator: Validator) -> Self {
        info!(
            "Creating prediction handler: {} severity labels",
            model.labels().len()
        );
        Self { model, validator }
    }

    /// Load the model artifact and create a handler.
    ///
    /// Fails with `ModelUnavailable` when the artifact is missing or corrupt.
    pub fn from_path(path: impl AsRef<Path>, validator: Validator) -> Result<Self, InferenceError> {
        let model = ForestClassifier::load(path)?;
        Ok(Self::new(Arc::new(model), validator))
    }

    /// Predict the severity for a validated feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let start = Instant::now();
        let row = features.as_row();

        let probabilities = self.model.predict_proba(&row)?;
        let labels = self.model.labels();
        if probabilities.len() != labels.len() {
            return Err(InferenceError::InferenceFailed(format!(
                "model returned {} probabilities for {} labels",
                probabilities.len(),
                labels.len()
            )));
        }

        let best = argmax(&probabilities)
            .ok_or_else(|| InferenceError::InferenceFailed("model has no labels".to_string()))?;
        let severity = labels[best].clone();
        let confidence = probabilities[best];

        trace!(
            "Prediction: {} (conf={:.2}, latency={}us)",
            severity,
            confidence,
            start.elapsed().as_micros()
        );

        Ok(PredictionResult {
            severity,
            confidence,
            probabilities: labels
                .iter()
                .cloned()
                .zip(probabilities)
                .map(|(label, probability)| ClassProbability { label, probability })
                .collect(),
            features: *features,
        })
    }

    /// Validate raw input, then predict
    pub fn handle(&self, raw: &RawFeatures) -> Result<PredictionResult, InferenceError> {
        let features = self.validator.validate(raw)?;
        self.predict(&features)
    }

    /// Feature importances paired with their model columns
    pub fn feature_importances(&self) -> Vec<FeatureImportance> {
        FEATURE_COLUMNS
            .iter()
            .zip(self.model.feature_importances())
            .map(|(&feature, &importance)| FeatureImportance { feature, importance })
            .collect()
    }

    /// Labels the model can produce
    pub fn labels(&self) -> &[SeverityLabel] {
        self.model.labels()
    }

    /// Input validator
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tests::forest;
    use data_validator::{DayInput, ValidationError};
    use feature_engine::{DayOfWeek, FEATURE_DIMENSION};
    use std::sync::Mutex;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Records the level of every event it sees
    #[derive(Clone, Default)]
    struct EventLevels(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for EventLevels {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    /// Always answers the same label, no matter the input
    struct ConstantModel {
        labels: Vec<SeverityLabel>,
        importances: Vec<f64>,
    }

    impl SeverityModel for ConstantModel {
        fn labels(&self) -> &[SeverityLabel] {
            &self.labels
        }

        fn predict_proba(
            &self,
            _row: &[f64; FEATURE_DIMENSION],
        ) -> Result<Vec<f64>, InferenceError> {
            Ok(vec![0.0, 1.0])
        }

        fn feature_importances(&self) -> &[f64] {
            &self.importances
        }
    }

    fn handler() -> PredictionHandler {
        PredictionHandler::new(Arc::new(forest()), Validator::default())
    }

    fn boundary_input() -> RawFeatures {
        RawFeatures {
            hour: Some(0.0),
            day_of_week: Some(DayInput::Name("Lunes".to_string())),
            temperature_f: Some(-20.0),
            humidity_pct: Some(0.0),
            visibility_mi: Some(0.0),
            wind_speed_mph: Some(0.0),
        }
    }

    #[test]
    fn test_boundary_input_returns_a_label() {
        let handler = handler();
        let result = handler.handle(&boundary_input()).unwrap();
        assert!(handler.labels().contains(&result.severity));
        assert_eq!(result.features.day_of_week(), DayOfWeek::Monday);
        assert_eq!(result.probabilities.len(), 3);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let handler = handler();
        let first = handler.handle(&boundary_input()).unwrap();
        for _ in 0..10 {
            assert_eq!(handler.handle(&boundary_input()).unwrap(), first);
        }
    }

    #[test]
    fn test_confidence_matches_winning_probability() {
        let features = FeatureVector::new(3, DayOfWeek::Wednesday, 40.0, 90.0, 1.0, 10.0).unwrap();
        let result = handler().predict(&features).unwrap();
        assert_eq!(result.severity, SeverityLabel::Numeric(3));
        assert!((result.confidence - 0.65).abs() < 1e-9);
        let best = result
            .probabilities
            .iter()
            .map(|p| p.probability)
            .fold(0.0, f64::max);
        assert_eq!(result.confidence, best);
    }

    #[test]
    fn test_invalid_input_is_surfaced() {
        let raw = RawFeatures {
            hour: Some(24.0),
            ..boundary_input()
        };
        match handler().handle(&raw) {
            Err(InferenceError::InvalidInput(ValidationError::OutOfRange { field, .. })) => {
                assert_eq!(field, "hour")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_invalid_input() {
        let raw = RawFeatures {
            day_of_week: None,
            ..boundary_input()
        };
        assert!(matches!(
            handler().handle(&raw),
            Err(InferenceError::InvalidInput(ValidationError::MissingField("day_of_week")))
        ));
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let result = PredictionHandler::from_path("/no/such/modelo.json", Validator::default());
        assert!(matches!(result, Err(InferenceError::ModelUnavailable(_))));
    }

    #[test]
    fn test_feature_importances_follow_columns() {
        let importances = handler().feature_importances();
        assert_eq!(importances.len(), FEATURE_DIMENSION);
        for (entry, column) in importances.iter().zip(FEATURE_COLUMNS) {
            assert_eq!(entry.feature, column);
            assert!(entry.importance >= 0.0);
        }
        assert_eq!(importances[4].importance, 0.25);
    }

    #[test]
    fn test_injected_model_is_used() {
        let model = ConstantModel {
            labels: vec![
                SeverityLabel::Text("Leve".to_string()),
                SeverityLabel::Text("Grave".to_string()),
            ],
            importances: vec![1.0 / 6.0; FEATURE_DIMENSION],
        };
        let handler = PredictionHandler::new(Arc::new(model), Validator::default());
        let result = handler.handle(&boundary_input()).unwrap();
        assert_eq!(result.severity, SeverityLabel::Text("Grave".to_string()));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_prediction_path_logs_at_trace_only() {
        let handler = handler();
        let levels = EventLevels::default();
        let subscriber = tracing_subscriber::registry().with(levels.clone());

        tracing::subscriber::with_default(subscriber, || {
            handler.handle(&boundary_input()).unwrap();
        });

        let levels = levels.0.lock().unwrap();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|level| *level == Level::TRACE));
    }
}
