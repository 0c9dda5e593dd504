use crate::core::dataset::{Dataset, TrainingSource};
use crate::domain::model::AssessmentKind;
use crate::utils::error::{CopilotError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const LEARNING_RATE: f64 = 0.1;
const EPOCHS: usize = 400;
const SVM_LAMBDA: f64 = 0.01;

/// Per-feature standardisation. A constant feature maps to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.is_empty() {
            return Self {
                means: vec![0.0; width],
                stds: vec![0.0; width],
            };
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, x), m) in stds.iter_mut().zip(row).zip(&means) {
                let d = x - m;
                *s += d * d;
            }
        }
        stds.iter_mut().for_each(|s| *s = (*s / n).sqrt());

        Self { means, stds }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (mean, std))| if *std == 0.0 { 0.0 } else { (x - mean) / std })
            .collect()
    }
}

fn dot(weights: &[f64], x: &[f64]) -> f64 {
    weights.iter().zip(x).map(|(w, x)| w * x).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticRegression {
    /// Batch gradient descent on log-loss.
    pub fn fit(xs: &[Vec<f64>], ys: &[bool], lr: f64, epochs: usize) -> Option<Self> {
        if xs.len() != ys.len() || xs.is_empty() || lr <= 0.0 || epochs == 0 {
            return None;
        }

        let n = xs.len() as f64;
        let width = xs[0].len();
        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (x, &y) in xs.iter().zip(ys) {
                let target = if y { 1.0 } else { 0.0 };
                let diff = sigmoid(dot(&weights, x) + bias) - target;
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += diff * xi;
                }
                grad_b += diff;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= lr * g / n;
            }
            bias -= lr * grad_b / n;
        }

        Some(Self { weights, bias })
    }

    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        sigmoid(dot(&self.weights, x) + self.bias)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvm {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearSvm {
    /// Sub-gradient descent on L2-regularised hinge loss.
    pub fn fit(xs: &[Vec<f64>], ys: &[bool], lr: f64, epochs: usize, lambda: f64) -> Option<Self> {
        if xs.len() != ys.len() || xs.is_empty() || lr <= 0.0 || epochs == 0 {
            return None;
        }

        let n = xs.len() as f64;
        let width = xs[0].len();
        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..epochs {
            let mut grad_w: Vec<f64> = weights.iter().map(|w| lambda * w).collect();
            let mut grad_b = 0.0;

            for (x, &y) in xs.iter().zip(ys) {
                let target = if y { 1.0 } else { -1.0 };
                if target * (dot(&weights, x) + bias) < 1.0 {
                    for (g, xi) in grad_w.iter_mut().zip(x) {
                        *g -= target * xi / n;
                    }
                    grad_b -= target / n;
                }
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= lr * g;
            }
            bias -= lr * grad_b;
        }

        Some(Self { weights, bias })
    }

    pub fn decision(&self, x: &[f64]) -> f64 {
        dot(&self.weights, x) + self.bias
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression(LogisticRegression),
    LinearSvm(LinearSvm),
}

impl Classifier {
    /// Signed margin; positive means the positive class.
    pub fn decision(&self, x: &[f64]) -> f64 {
        match self {
            Classifier::LogisticRegression(model) => model.predict_proba(x) - 0.5,
            Classifier::LinearSvm(model) => model.decision(x),
        }
    }

    pub fn predict(&self, x: &[f64]) -> bool {
        self.decision(x) > 0.0
    }

    /// Number of weights, i.e. features the model was fitted on.
    pub fn width(&self) -> usize {
        match self {
            Classifier::LogisticRegression(model) => model.weights.len(),
            Classifier::LinearSvm(model) => model.weights.len(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Classifier::LogisticRegression(_) => "logistic regression",
            Classifier::LinearSvm(_) => "linear SVM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub positive: bool,
    pub decision: f64,
}

/// A fitted classifier plus everything needed to reuse it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub kind: AssessmentKind,
    pub scaler: StandardScaler,
    pub classifier: Classifier,
    pub source: TrainingSource,
    pub samples: usize,
    pub training_accuracy: f64,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    /// Diabetes and Parkinson's use a linear SVM, heart disease a logistic regression.
    pub fn train(dataset: &Dataset, source: TrainingSource) -> Result<Self> {
        let kind = dataset.kind;
        let positives = dataset.positives();
        if dataset.is_empty() || positives == 0 || positives == dataset.len() {
            return Err(CopilotError::TrainingDataError {
                message: format!(
                    "{} training data needs both classes ({} of {} rows positive)",
                    kind.slug(),
                    positives,
                    dataset.len()
                ),
            });
        }

        let scaler = StandardScaler::fit(&dataset.rows);
        let scaled: Vec<Vec<f64>> = dataset.rows.iter().map(|r| scaler.transform(r)).collect();

        let classifier = match kind {
            AssessmentKind::Heart => {
                LogisticRegression::fit(&scaled, &dataset.labels, LEARNING_RATE, EPOCHS)
                    .map(Classifier::LogisticRegression)
            }
            AssessmentKind::Diabetes | AssessmentKind::Parkinsons => {
                LinearSvm::fit(&scaled, &dataset.labels, LEARNING_RATE, EPOCHS, SVM_LAMBDA)
                    .map(Classifier::LinearSvm)
            }
        }
        .ok_or_else(|| CopilotError::ModelError {
            message: format!("could not fit {} model", kind.slug()),
        })?;

        let correct = scaled
            .iter()
            .zip(&dataset.labels)
            .filter(|(x, y)| classifier.predict(x) == **y)
            .count();
        let training_accuracy = correct as f64 / dataset.len() as f64;

        tracing::info!(
            "Trained {} {} on {} samples (training accuracy {:.1}%)",
            kind.slug(),
            classifier.name(),
            dataset.len(),
            training_accuracy * 100.0
        );

        Ok(Self {
            kind,
            scaler,
            classifier,
            source,
            samples: dataset.len(),
            training_accuracy,
            trained_at: Utc::now(),
        })
    }

    pub fn trained_from(&self, source: &TrainingSource) -> bool {
        &self.source == source
    }

    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        let expected = self.kind.features().len();
        if features.len() != expected {
            return Err(CopilotError::ModelError {
                message: format!(
                    "{} model expects {} features, got {}",
                    self.kind.slug(),
                    expected,
                    features.len()
                ),
            });
        }

        // 快取檔可能被手動修改或截斷
        let shape = [
            self.scaler.means.len(),
            self.scaler.stds.len(),
            self.classifier.width(),
        ];
        if shape.iter().any(|&len| len != expected) {
            return Err(CopilotError::ModelError {
                message: format!(
                    "{} model is corrupt: scaler/weights sizes {:?}, expected {}",
                    self.kind.slug(),
                    shape,
                    expected
                ),
            });
        }

        let decision = self.classifier.decision(&self.scaler.transform(features));
        Ok(Prediction {
            positive: decision > 0.0,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClinicalInput, DiabetesInput};

    fn synthetic_source(samples: usize) -> TrainingSource {
        TrainingSource::Synthetic { samples, seed: 42 }
    }

    #[test]
    fn test_scaler_constant_column() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let scaler = StandardScaler::fit(&rows);
        assert_eq!(scaler.means, vec![2.0, 5.0]);
        assert_eq!(scaler.transform(&[3.0, 5.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_logistic_regression_separates_1d() {
        let xs: Vec<Vec<f64>> = (-5..=5).filter(|&i| i != 0).map(|i| vec![i as f64]).collect();
        let ys: Vec<bool> = xs.iter().map(|x| x[0] > 0.0).collect();
        let model = LogisticRegression::fit(&xs, &ys, 0.5, 500).unwrap();
        assert!(model.predict_proba(&[3.0]) > 0.9);
        assert!(model.predict_proba(&[-3.0]) < 0.1);
    }

    #[test]
    fn test_linear_svm_separates_1d() {
        let xs: Vec<Vec<f64>> = (-5..=5).filter(|&i| i != 0).map(|i| vec![i as f64]).collect();
        let ys: Vec<bool> = xs.iter().map(|x| x[0] > 0.0).collect();
        let model = LinearSvm::fit(&xs, &ys, 0.1, 300, 0.01).unwrap();
        assert!(model.decision(&[2.0]) > 0.0);
        assert!(model.decision(&[-2.0]) < 0.0);
    }

    #[test]
    fn test_fit_rejects_mismatched_lengths() {
        assert!(LogisticRegression::fit(&[vec![1.0]], &[true, false], 0.1, 10).is_none());
        assert!(LinearSvm::fit(&[], &[], 0.1, 10, 0.01).is_none());
    }

    #[test]
    fn test_train_requires_both_classes() {
        let dataset = Dataset {
            kind: AssessmentKind::Diabetes,
            rows: vec![vec![0.0; 8], vec![1.0; 8]],
            labels: vec![true, true],
        };
        assert!(matches!(
            TrainedModel::train(&dataset, synthetic_source(2)),
            Err(CopilotError::TrainingDataError { .. })
        ));
    }

    #[test]
    fn test_trained_diabetes_model_follows_risk() {
        let dataset = Dataset::synthetic(AssessmentKind::Diabetes, 500, 42);
        let model = TrainedModel::train(&dataset, synthetic_source(500)).unwrap();
        assert!(model.training_accuracy > 0.7, "accuracy {}", model.training_accuracy);

        let high_risk = DiabetesInput {
            pregnancies: 10,
            glucose: 190,
            blood_pressure: 100,
            skin_thickness: 40,
            insulin: 200,
            bmi: 45.0,
            diabetes_pedigree: 2.0,
            age: 75,
        };
        let low_risk = DiabetesInput {
            pregnancies: 0,
            glucose: 80,
            blood_pressure: 60,
            skin_thickness: 20,
            insulin: 80,
            bmi: 21.0,
            diabetes_pedigree: 0.2,
            age: 25,
        };
        assert!(model.predict(&high_risk.features()).unwrap().positive);
        assert!(!model.predict(&low_risk.features()).unwrap().positive);
    }

    #[test]
    fn test_predict_checks_feature_count() {
        let dataset = Dataset::synthetic(AssessmentKind::Heart, 200, 1);
        let model = TrainedModel::train(&dataset, synthetic_source(200)).unwrap();
        assert!(matches!(model.classifier, Classifier::LogisticRegression(_)));
        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_predict_rejects_truncated_weights() {
        let dataset = Dataset::synthetic(AssessmentKind::Diabetes, 200, 5);
        let mut model = TrainedModel::train(&dataset, synthetic_source(200)).unwrap();
        let features = vec![1.0; 8];
        assert!(model.predict(&features).is_ok());

        if let Classifier::LinearSvm(svm) = &mut model.classifier {
            svm.weights.truncate(5);
        }
        let err = model.predict(&features).unwrap_err();
        assert!(err.to_string().contains("corrupt"), "{}", err);
    }

    #[test]
    fn test_model_survives_json() {
        let dataset = Dataset::synthetic(AssessmentKind::Parkinsons, 150, 3);
        let model = TrainedModel::train(&dataset, synthetic_source(150)).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"algorithm\":\"linear_svm\""));
        let restored: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.kind, AssessmentKind::Parkinsons);
        assert_eq!(restored.classifier, model.classifier);
    }
}
