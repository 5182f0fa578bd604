use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Input arity a model was trained against. Declared in the model file at
/// registration time, never discovered by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FeatureWidth {
    Four,
    Five,
}

impl FeatureWidth {
    pub fn count(self) -> usize {
        match self {
            FeatureWidth::Four => 4,
            FeatureWidth::Five => 5,
        }
    }

    /// Whether the fifth (volume) input is expected.
    pub fn includes_volume(self) -> bool {
        matches!(self, FeatureWidth::Five)
    }
}

impl TryFrom<u8> for FeatureWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(FeatureWidth::Four),
            5 => Ok(FeatureWidth::Five),
            other => Err(format!("feature_count must be 4 or 5, got {}", other)),
        }
    }
}

impl From<FeatureWidth> for u8 {
    fn from(width: FeatureWidth) -> u8 {
        width.count() as u8
    }
}

/// Linear regression scorer: coefficients · features + intercept.
#[derive(Debug, Clone)]
pub struct LinearModel {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Array1::from(coefficients),
            intercept,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.coefficients.len()
    }

    /// Scores one feature vector. A row of the wrong arity or carrying a
    /// non-finite value is a model invocation failure, not a panic.
    pub fn predict(&self, features: &Array1<f64>) -> Result<f64, PredictError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictError::ModelFailure {
                reason: format!(
                    "expected {} inputs, got {}",
                    self.coefficients.len(),
                    features.len()
                ),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::ModelFailure {
                reason: "feature row contains a non-finite value".to_string(),
            });
        }
        Ok(self.coefficients.dot(features) + self.intercept)
    }
}

/// One instrument's stored model: the declared input width plus either a
/// single set of weights or an ordered collection of named candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub feature_count: FeatureWidth,
    pub entry: ModelEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelEntry {
    Single {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Candidates {
        models: Vec<NamedWeights>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedWeights {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_width_accepts_only_4_or_5() {
        assert_eq!(FeatureWidth::try_from(4), Ok(FeatureWidth::Four));
        assert_eq!(FeatureWidth::try_from(5), Ok(FeatureWidth::Five));
        assert!(FeatureWidth::try_from(3).is_err());
        assert!(FeatureWidth::try_from(6).is_err());
    }

    #[test]
    fn test_feature_width_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&FeatureWidth::Four).unwrap(), "4");
        let width: FeatureWidth = serde_json::from_str("5").unwrap();
        assert_eq!(width, FeatureWidth::Five);
        assert!(serde_json::from_str::<FeatureWidth>("7").is_err());
    }

    #[test]
    fn test_predict_is_dot_product_plus_intercept() {
        let model = LinearModel::new(vec![0.5, -1.0, 2.0, 0.0], 0.1);
        let features = Array1::from(vec![2.0, 1.0, 0.5, 100.0]);
        let raw = model.predict(&features).unwrap();
        assert!((raw - (1.0 - 1.0 + 1.0 + 0.0 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_rejects_wrong_arity() {
        let model = LinearModel::new(vec![1.0, 1.0, 1.0, 1.0], 0.0);
        let features = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let err = model.predict(&features).unwrap_err();
        assert!(err.to_string().contains("expected 4 inputs, got 5"));
    }

    #[test]
    fn test_predict_rejects_non_finite_input() {
        let model = LinearModel::new(vec![1.0, 1.0], 0.0);
        let features = Array1::from(vec![1.0, f64::NAN]);
        assert!(model.predict(&features).is_err());
    }

    #[test]
    fn test_model_file_single_round_trip() {
        let json = r#"{
            "feature_count": 4,
            "entry": { "kind": "single", "coefficients": [0.1, 0.2, 0.3, 0.4], "intercept": 0.01 }
        }"#;
        let file: ModelFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.feature_count, FeatureWidth::Four);
        match file.entry {
            ModelEntry::Single { coefficients, intercept } => {
                assert_eq!(coefficients.len(), 4);
                assert!((intercept - 0.01).abs() < 1e-12);
            }
            ModelEntry::Candidates { .. } => panic!("expected single entry"),
        }
    }

    #[test]
    fn test_model_file_candidates_preserve_order() {
        let json = r#"{
            "feature_count": 4,
            "entry": { "kind": "candidates", "models": [
                { "name": "ridge", "coefficients": [1.0, 1.0, 1.0, 1.0, 1.0], "intercept": 0.0 },
                { "name": "linear", "coefficients": [1.0, 1.0, 1.0, 1.0], "intercept": 0.0 }
            ] }
        }"#;
        let file: ModelFile = serde_json::from_str(json).unwrap();
        match file.entry {
            ModelEntry::Candidates { models } => {
                assert_eq!(models[0].name, "ridge");
                assert_eq!(models[1].name, "linear");
            }
            ModelEntry::Single { .. } => panic!("expected candidates entry"),
        }
    }
}
