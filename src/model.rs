use std::fmt;
use std::path::Path;

use linfa::traits::Predict;
use linfa_logistic::FittedLogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DashboardError, Result};

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; 12] = [
    "Course",
    "Previous_qualification_grade",
    "Admission_grade",
    "Tuition_fees_up_to_date",
    "Age_at_enrollment",
    "Scholarship_holder",
    "Curricular_units_1st_sem_grade",
    "Curricular_units_2nd_sem_grade",
    "Curricular_units_1st_sem_evaluations",
    "Curricular_units_2nd_sem_evaluations",
    "Curricular_units_2nd_sem_approved",
    "Fathers_occupation",
];

/// Predicted class. Label 0 is Dropout, label 1 is Graduate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Dropout,
    Graduate,
}

impl Outcome {
    pub fn from_label(label: usize) -> Result<Self> {
        match label {
            0 => Ok(Outcome::Dropout),
            1 => Ok(Outcome::Graduate),
            other => Err(DashboardError::InvalidModelOutput(format!(
                "unexpected class label {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Dropout => "Dropout",
            Outcome::Graduate => "Graduate",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Outcome::Dropout => "#e74c3c",
            Outcome::Graduate => "#2ecc71",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The narrow contract the prediction page relies on.
///
/// Rows of `features` follow [`FEATURE_NAMES`]. `predict` returns one class
/// label per row; `predict_proba` returns one `[p_dropout, p_graduate]` row
/// per input row.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>>;
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>>;
}

/// On-disk classifier: the feature schema, an optional standardizer and the
/// fitted linfa logistic regression, serialized as linfa writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<ScalerArtifact>,
    pub model: FittedLogisticRegression<f64, usize>,
}

/// Standardization applied before the linear term: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Scaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

/// Fitted logistic regression scoring the Graduate class (label 1).
#[derive(Debug, Clone)]
pub struct LogisticModel {
    fitted: FittedLogisticRegression<f64, usize>,
    scaler: Option<Scaler>,
}

impl LogisticModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DashboardError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|source| DashboardError::ModelParse {
                path: path.to_path_buf(),
                source,
            })?;
        let model = Self::from_artifact(artifact)?;
        info!(
            path = %path.display(),
            features = FEATURE_NAMES.len(),
            intercept = model.fitted.intercept(),
            scaled = model.scaler.is_some(),
            "loaded classifier"
        );
        Ok(model)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let width = FEATURE_NAMES.len();

        if artifact.feature_names.len() != width
            || artifact
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(got, want)| got != want)
        {
            return Err(DashboardError::ModelSchema(format!(
                "expected features {:?}, artifact has {:?}",
                FEATURE_NAMES, artifact.feature_names
            )));
        }

        let fitted = artifact.model;
        if fitted.params().len() != width {
            return Err(DashboardError::ModelSchema(format!(
                "expected {width} coefficients, got {}",
                fitted.params().len()
            )));
        }
        if !fitted.intercept().is_finite() || fitted.params().iter().any(|w| !w.is_finite()) {
            return Err(DashboardError::ModelSchema(
                "coefficients must be finite".to_string(),
            ));
        }
        let labels = fitted.labels();
        if labels.pos.class != 1 || labels.neg.class != 0 {
            return Err(DashboardError::ModelSchema(format!(
                "expected classes 1 (positive) and 0 (negative), got {} and {}",
                labels.pos.class, labels.neg.class
            )));
        }

        let scaler = match artifact.scaler {
            Some(s) => {
                if s.mean.len() != width || s.scale.len() != width {
                    return Err(DashboardError::ModelSchema(format!(
                        "scaler must have {width} means and scales"
                    )));
                }
                if s.scale.iter().any(|&v| v == 0.0 || !v.is_finite()) {
                    return Err(DashboardError::ModelSchema(
                        "scaler scales must be finite and non-zero".to_string(),
                    ));
                }
                Some(Scaler {
                    mean: Array1::from(s.mean),
                    scale: Array1::from(s.scale),
                })
            }
            None => None,
        };

        Ok(LogisticModel { fitted, scaler })
    }

    /// Checks the column count and applies the standardizer, if any.
    fn prepare(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != self.fitted.params().len() {
            return Err(DashboardError::ModelSchema(format!(
                "expected {} feature columns, got {}",
                self.fitted.params().len(),
                features.ncols()
            )));
        }
        Ok(match &self.scaler {
            Some(s) => (features - &s.mean) / &s.scale,
            None => features.clone(),
        })
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<usize>> {
        let x = self.prepare(features)?;
        let labels: Array1<usize> = self.fitted.predict(&x);
        Ok(labels)
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        let x = self.prepare(features)?;
        let graduate = self.fitted.predict_probabilities(&x);
        let mut out = Array2::zeros((graduate.len(), 2));
        for (&p, mut probs) in graduate.iter().zip(out.outer_iter_mut()) {
            probs[0] = 1.0 - p;
            probs[1] = p;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use serde_json::json;

    fn fitted(coefficients: &[f64], intercept: f64) -> FittedLogisticRegression<f64, usize> {
        serde_json::from_value(json!({
            "threshold": 0.5,
            "intercept": intercept,
            "params": { "v": 1, "dim": [coefficients.len()], "data": coefficients },
            "labels": {
                "pos": { "class": 1, "label": 1.0 },
                "neg": { "class": 0, "label": -1.0 }
            }
        }))
        .unwrap()
    }

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler: None,
            model: fitted(&[0.0; 12], 0.0),
        }
    }

    fn logistic(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn zero_weights_give_even_odds() {
        let model = LogisticModel::from_artifact(artifact()).unwrap();
        let x = Array2::from_elem((1, 12), 3.0);
        let proba = model.predict_proba(&x).unwrap();
        assert!((proba[[0, 0]] - 0.5).abs() < 1e-12);
        assert!((proba[[0, 1]] - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&x).unwrap(), array![1usize]);
    }

    #[test]
    fn approved_units_push_towards_graduate() {
        let mut coefficients = [0.0; 12];
        coefficients[10] = 0.8;
        let a = ModelArtifact {
            model: fitted(&coefficients, -2.0),
            ..artifact()
        };
        let model = LogisticModel::from_artifact(a).unwrap();

        let mut x = Array2::zeros((2, 12));
        x[[0, 10]] = 0.0;
        x[[1, 10]] = 6.0;

        assert_eq!(model.predict(&x).unwrap(), array![0usize, 1]);
        let proba = model.predict_proba(&x).unwrap();
        for row in proba.outer_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
        assert!((proba[[0, 1]] - logistic(-2.0)).abs() < 1e-12);
        assert!((proba[[1, 1]] - logistic(2.8)).abs() < 1e-12);
    }

    #[test]
    fn scaler_is_applied_before_weights() {
        let mut coefficients = [0.0; 12];
        coefficients[4] = 1.0;
        let mut mean = vec![0.0; 12];
        mean[4] = 20.0;
        let a = ModelArtifact {
            scaler: Some(ScalerArtifact {
                mean,
                scale: vec![2.0; 12],
            }),
            model: fitted(&coefficients, 0.0),
            ..artifact()
        };
        let model = LogisticModel::from_artifact(a).unwrap();
        let mut x = Array2::zeros((1, 12));
        x[[0, 4]] = 24.0;
        let proba = model.predict_proba(&x).unwrap();
        assert!((proba[[0, 1]] - logistic(2.0)).abs() < 1e-12);
    }

    #[test]
    fn mismatched_schema_is_rejected() {
        let mut a = artifact();
        a.feature_names.swap(0, 1);
        assert!(matches!(
            LogisticModel::from_artifact(a),
            Err(DashboardError::ModelSchema(_))
        ));

        let a = ModelArtifact {
            model: fitted(&[0.0; 11], 0.0),
            ..artifact()
        };
        assert!(LogisticModel::from_artifact(a).is_err());

        let mut a = artifact();
        a.scaler = Some(ScalerArtifact {
            mean: vec![0.0; 12],
            scale: vec![0.0; 12],
        });
        assert!(LogisticModel::from_artifact(a).is_err());
    }

    #[test]
    fn swapped_classes_are_rejected() {
        let model = serde_json::from_value(json!({
            "threshold": 0.5,
            "intercept": 0.0,
            "params": { "v": 1, "dim": [12], "data": vec![0.0f64; 12] },
            "labels": {
                "pos": { "class": 0, "label": 1.0 },
                "neg": { "class": 1, "label": -1.0 }
            }
        }))
        .unwrap();
        let a = ModelArtifact {
            model,
            ..artifact()
        };
        assert!(matches!(
            LogisticModel::from_artifact(a),
            Err(DashboardError::ModelSchema(_))
        ));
    }

    #[test]
    fn wrong_width_input_is_an_error() {
        let model = LogisticModel::from_artifact(artifact()).unwrap();
        let x = Array2::zeros((1, 5));
        assert!(model.predict(&x).is_err());
        assert!(model.predict_proba(&x).is_err());
    }

    #[test]
    fn artifact_scaler_is_optional() {
        let json = json!({
            "feature_names": FEATURE_NAMES,
            "model": serde_json::to_value(fitted(&[0.1; 12], -0.2)).unwrap()
        });
        let a: ModelArtifact = serde_json::from_value(json).unwrap();
        assert!(a.scaler.is_none());
        assert_eq!(a.model.params().len(), 12);
        assert_eq!(a.model.intercept(), -0.2);
    }

    #[test]
    fn missing_artifact_fails() {
        assert!(matches!(
            LogisticModel::load("no/such/model.json"),
            Err(DashboardError::ModelRead { .. })
        ));
    }

    #[test]
    fn labels_map_to_outcomes() {
        assert_eq!(Outcome::from_label(0).unwrap(), Outcome::Dropout);
        assert_eq!(Outcome::from_label(1).unwrap(), Outcome::Graduate);
        assert!(Outcome::from_label(2).is_err());
    }
}
