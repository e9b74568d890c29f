//! Severity Model Interface

use crate::InferenceError;
use feature_engine::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class produced by the model.
///
/// The label set belongs to the trained model; classifiers exported from
/// numeric targets carry integers, others carry strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeverityLabel {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLabel::Numeric(n) => write!(f, "{}", n),
            SeverityLabel::Text(s) => f.write_str(s),
        }
    }
}

/// A trained classifier mapping one feature row to a severity label
pub trait SeverityModel: Send + Sync {
    /// Labels the model can produce, in probability column order
    fn labels(&self) -> &[SeverityLabel];

    /// Probability of each label for a feature row
    fn predict_proba(&self, row: &[f64; FEATURE_DIMENSION]) -> Result<Vec<f64>, InferenceError>;

    /// Relative importance of each feature, in row order
    fn feature_importances(&self) -> &[f64];

    /// Most probable label; the first label wins ties
    fn predict(&self, row: &[f64; FEATURE_DIMENSION]) -> Result<SeverityLabel, InferenceError> {
        let probabilities = self.predict_proba(row)?;
        let best = argmax(&probabilities)
            .ok_or_else(|| InferenceError::InferenceFailed("empty probability vector".to_string()))?;
        self.labels().get(best).cloned().ok_or_else(|| {
            InferenceError::InferenceFailed(format!(
                "class index {} outside label set of {}",
                best,
                self.labels().len()
            ))
        })
    }
}

/// Index of the largest value, first one on ties
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[1.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_label_serde() {
        let labels: Vec<SeverityLabel> = serde_json::from_str(r#"[2, "Grave"]"#).unwrap();
        assert_eq!(labels[0], SeverityLabel::Numeric(2));
        assert_eq!(labels[1], SeverityLabel::Text("Grave".to_string()));
        assert_eq!(labels[0].to_string(), "2");
        assert_eq!(serde_json::to_string(&labels).unwrap(), r#"[2,"Grave"]"#);
    }
}
