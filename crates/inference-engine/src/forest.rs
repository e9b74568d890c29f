//! Tree-Ensemble Classifier
//!
//! Loads decision trees and random forests exported from scikit-learn as
//! JSON. Each tree keeps the flat node arrays of the fitted estimator
//! (`children_left`, `children_right`, `feature`, `threshold`, `value`), so
//! prediction walks exactly the splits learned at training time.

use crate::model::{SeverityLabel, SeverityModel};
use crate::InferenceError;
use feature_engine::{FEATURE_COLUMNS, FEATURE_DIMENSION};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, trace};

/// Marks a missing child in the node arrays
const LEAF: i64 = -1;

/// A single fitted decision tree
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Per-node class weights
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Number of nodes
    pub fn n_nodes(&self) -> usize {
        self.children_left.len()
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.children_left.iter().filter(|&&c| c == LEAF).count()
    }

    /// Check that every node is well formed and the root reaches only
    /// nodes stored after their parent.
    fn validate(&self, n_classes: usize) -> Result<(), String> {
        let n = self.n_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays differ in length".to_string());
        }

        for node in 0..n {
            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    weights.len(),
                    n_classes
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("node {} has invalid class weights", node));
            }

            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has only a right child", node));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {} carries no weight", node));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} points to invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_DIMENSION as i64 {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {} has a non-finite threshold", node));
            }
        }
        Ok(())
    }

    /// Class distribution of the leaf the row falls into
    fn leaf_distribution(&self, row: &[f64; FEATURE_DIMENSION]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            // Trees are fit on float32 inputs; compare at the same precision.
            let x = row[feature] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total).collect()
    }
}

/// Serialized form of the model artifact
#[derive(Debug, Deserialize)]
struct ForestArtifact {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    classes: Vec<SeverityLabel>,
    feature_importances: Vec<f64>,
    trees: Vec<DecisionTree>,
}

/// Soft-voting ensemble of decision trees (a single tree is a forest of one)
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    classes: Vec<SeverityLabel>,
    feature_importances: Vec<f64>,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Load the model artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading severity model from {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            InferenceError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_slice(&bytes)
    }

    /// Parse a model artifact from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InferenceError> {
        let artifact: ForestArtifact = serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::ModelUnavailable(format!("malformed artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self, InferenceError> {
        let unavailable = InferenceError::ModelUnavailable;

        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                return Err(unavailable(format!(
                    "model expects columns {:?}, dashboard provides {:?}",
                    names, FEATURE_COLUMNS
                )));
            }
        }
        if artifact.classes.is_empty() {
            return Err(unavailable("model has no classes".to_string()));
        }
        if artifact.feature_importances.len() != FEATURE_DIMENSION {
            return Err(unavailable(format!(
                "expected {} feature importances, got {}",
                FEATURE_DIMENSION,
                artifact.feature_importances.len()
            )));
        }
        if artifact
            .feature_importances
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(unavailable("feature importances must be non-negative".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(unavailable("model has no trees".to_string()));
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            tree.validate(artifact.classes.len())
                .map_err(|e| unavailable(format!("tree {}: {}", i, e)))?;
        }

        info!(
            "Severity model ready: type={}, trees={}, classes={:?}",
            artifact.model_type.as_deref().unwrap_or("unspecified"),
            artifact.trees.len(),
            artifact.classes
        );

        Ok(Self {
            classes: artifact.classes,
            feature_importances: artifact.feature_importances,
            trees: artifact.trees,
        })
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Trees in the ensemble
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl SeverityModel for ForestClassifier {
    fn labels(&self) -> &[SeverityLabel] {
        &self.classes
    }

    fn predict_proba(&self, row: &[f64; FEATURE_DIMENSION]) -> Result<Vec<f64>, InferenceError> {
        let mut probabilities = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (p, q) in probabilities.iter_mut().zip(tree.leaf_distribution(row)) {
                *p += q;
            }
        }

        let n_trees = self.trees.len() as f64;
        probabilities.iter_mut().for_each(|p| *p /= n_trees);
        trace!("Class probabilities: {:?}", probabilities);
        Ok(probabilities)
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::io::Write;

    /// Two trees over classes [1, 2, 3]:
    /// tree 0 splits on visibility_mi <= 2.5, tree 1 on hour <= 6.5 then humidity_pct <= 80.
    pub(crate) fn forest_json() -> serde_json::Value {
        json!({
            "model_type": "RandomForestClassifier",
            "feature_names": FEATURE_COLUMNS,
            "classes": [1, 2, 3],
            "feature_importances": [0.30, 0.05, 0.10, 0.20, 0.25, 0.10],
            "trees": [
                {
                    "children_left":  [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature":        [4, -2, -2],
                    "threshold":      [2.5, -2.0, -2.0],
                    "value": [[30.0, 50.0, 20.0], [0.0, 2.0, 8.0], [30.0, 48.0, 12.0]]
                },
                {
                    "children_left":  [1, -1, 3, -1, -1],
                    "children_right": [2, -1, 4, -1, -1],
                    "feature":        [0, -2, 3, -2, -2],
                    "threshold":      [6.5, -2.0, 80.0, -2.0, -2.0],
                    "value": [
                        [40.0, 40.0, 20.0],
                        [2.0, 3.0, 5.0],
                        [38.0, 37.0, 15.0],
                        [30.0, 10.0, 5.0],
                        [8.0, 27.0, 10.0]
                    ]
                }
            ]
        })
    }

    pub(crate) fn forest() -> ForestClassifier {
        ForestClassifier::from_slice(forest_json().to_string().as_bytes()).unwrap()
    }

    fn reject(artifact: serde_json::Value) -> String {
        match ForestClassifier::from_slice(artifact.to_string().as_bytes()) {
            Err(InferenceError::ModelUnavailable(msg)) => msg,
            other => panic!("expected ModelUnavailable, got {:?}", other.map(|f| f.n_trees())),
        }
    }

    #[test]
    fn test_structure() {
        let forest = forest();
        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.trees()[0].n_nodes(), 3);
        assert_eq!(forest.trees()[1].n_leaves(), 3);
        assert_eq!(forest.labels().len(), 3);
    }

    #[test]
    fn test_low_visibility_at_night_is_severe() {
        // tree 0 -> [0, .2, .8], tree 1 -> [.2, .3, .5]
        let row = [3.0, 2.0, 40.0, 90.0, 1.0, 10.0];
        let proba = forest().predict_proba(&row).unwrap();
        assert!((proba[0] - 0.1).abs() < 1e-9);
        assert!((proba[1] - 0.25).abs() < 1e-9);
        assert!((proba[2] - 0.65).abs() < 1e-9);
        assert_eq!(forest().predict(&row).unwrap(), SeverityLabel::Numeric(3));
    }

    #[test]
    fn test_clear_afternoon_is_moderate() {
        // tree 0 -> [1/3, 8/15, 2/15], tree 1 (humidity 90 > 80) -> [8/45, 27/45, 10/45]
        let row = [15.0, 4.0, 75.0, 90.0, 10.0, 5.0];
        assert_eq!(forest().predict(&row).unwrap(), SeverityLabel::Numeric(2));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let at = [12.0, 0.0, 70.0, 80.0, 2.5, 5.0];
        let above = [12.0, 0.0, 70.0, 80.0, 2.6, 5.0];
        let forest = forest();
        let tree = &forest.trees()[0];
        assert_eq!(tree.leaf_distribution(&at), vec![0.0, 0.2, 0.8]);
        assert!((tree.leaf_distribution(&above)[0] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let proba = forest().predict_proba(&[0.0, 0.0, -20.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(forest_json().to_string().as_bytes()).unwrap();
        let forest = ForestClassifier::load(file.path()).unwrap();
        assert_eq!(forest.feature_importances().len(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = ForestClassifier::load("/nonexistent/modelo_accidentes.json");
        assert!(matches!(result, Err(InferenceError::ModelUnavailable(_))));
    }

    #[test]
    fn test_corrupt_file_is_unavailable() {
        let result = ForestClassifier::from_slice(b"\x80\x04\x95 not json");
        assert!(matches!(result, Err(InferenceError::ModelUnavailable(_))));
    }

    #[test]
    fn test_rejects_wrong_columns() {
        let mut artifact = forest_json();
        artifact["feature_names"] = json!(["hour", "day_of_week", "Temperature(F)"]);
        assert!(reject(artifact).contains("columns"));
    }

    #[test]
    fn test_rejects_wrong_importance_count() {
        let mut artifact = forest_json();
        artifact["feature_importances"] = json!([0.5, 0.5]);
        assert!(reject(artifact).contains("importances"));
    }

    #[test]
    fn test_rejects_negative_importance() {
        let mut artifact = forest_json();
        artifact["feature_importances"][2] = json!(-0.1);
        reject(artifact);
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut artifact = forest_json();
        artifact["trees"][1]["children_left"][2] = json!(1);
        assert!(reject(artifact).contains("tree 1"));
    }

    #[test]
    fn test_rejects_unknown_split_feature() {
        let mut artifact = forest_json();
        artifact["trees"][0]["feature"][0] = json!(6);
        assert!(reject(artifact).contains("unknown feature"));
    }

    #[test]
    fn test_rejects_class_count_mismatch() {
        let mut artifact = forest_json();
        artifact["classes"] = json!([1, 2]);
        assert!(reject(artifact).contains("class weights"));
    }

    #[test]
    fn test_rejects_empty_forest() {
        let mut artifact = forest_json();
        artifact["trees"] = json!([]);
        assert!(reject(artifact).contains("no trees"));
    }

    proptest! {
        #[test]
        fn prop_prediction_is_a_known_label(
            hour in 0u8..=23,
            day in 0u8..=6,
            temperature in -20.0f64..=120.0,
            humidity in 0.0f64..=100.0,
            visibility in 0.0f64..=50.0,
            wind in 0.0f64..=100.0,
        ) {
            let forest = forest();
            let row = [hour as f64, day as f64, temperature, humidity, visibility, wind];
            let label = forest.predict(&row).unwrap();
            prop_assert!(forest.labels().contains(&label));
            prop_assert_eq!(forest.predict(&row).unwrap(), label);
        }
    }
}
