use crate::core::scoring::{diabetes_score, heart_score};
use crate::domain::model::{AssessmentKind, DiabetesInput, FeatureSpec, HeartInput};
use crate::utils::error::{CopilotError, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Heuristic score at which a synthetic clinical sample is labelled positive.
const SYNTHETIC_POSITIVE_SCORE: u32 = 5;

/// Where a model's training rows came from. Stored alongside the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrainingSource {
    Synthetic { samples: usize, seed: u64 },
    Csv { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub kind: AssessmentKind,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    pub fn load(kind: AssessmentKind, source: &TrainingSource) -> Result<Self> {
        match source {
            TrainingSource::Synthetic { samples, seed } => Ok(Self::synthetic(kind, *samples, *seed)),
            TrainingSource::Csv { path } => Self::from_csv_path(kind, path),
        }
    }

    /// Uniform samples inside each feature's bounds, labelled by the matching
    /// heuristic rule so the fitted model has something to learn.
    pub fn synthetic(kind: AssessmentKind, samples: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let specs = kind.features();
        let mut rows = Vec::with_capacity(samples);
        let mut labels = Vec::with_capacity(samples);

        for _ in 0..samples {
            let row: Vec<f64> = specs.iter().map(|spec| sample(&mut rng, spec)).collect();
            labels.push(synthetic_label(kind, &row));
            rows.push(row);
        }

        tracing::debug!(
            "Generated {} synthetic {} samples (seed {})",
            samples,
            kind.slug(),
            seed
        );

        Self { kind, rows, labels }
    }

    pub fn from_csv_path<P: AsRef<Path>>(kind: AssessmentKind, path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        tracing::debug!("Reading {} training data from {}", kind.slug(), path.as_ref().display());
        Self::from_csv_reader(kind, file)
    }

    /// Reads a headed CSV. Feature columns are matched by name (case-insensitive),
    /// so extra columns such as a patient name are ignored.
    pub fn from_csv_reader<R: Read>(kind: AssessmentKind, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| CopilotError::TrainingDataError {
                    message: format!("missing column '{}'", name),
                })
        };

        let feature_columns = kind
            .features()
            .iter()
            .map(|spec| column(spec.name))
            .collect::<Result<Vec<_>>>()?;
        let label_column = column(kind.label_column())?;

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = feature_columns
                .iter()
                .map(|&idx| parse_cell(&record, &headers, idx, line))
                .collect::<Result<Vec<_>>>()?;
            let label = parse_cell(&record, &headers, label_column, line)?;
            if label != 0.0 && label != 1.0 {
                return Err(CopilotError::TrainingDataError {
                    message: format!(
                        "row {}, column '{}': label must be 0 or 1, got {}",
                        line + 1,
                        kind.label_column(),
                        label
                    ),
                });
            }
            rows.push(row);
            labels.push(label == 1.0);
        }

        if rows.is_empty() {
            return Err(CopilotError::TrainingDataError {
                message: "CSV contains no data rows".to_string(),
            });
        }

        Ok(Self { kind, rows, labels })
    }
}

/// `f64::from_str` accepts "NaN" and "inf"; those would poison the scaler.
fn parse_cell(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
    idx: usize,
    line: usize,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default();
    let column = headers.get(idx).unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CopilotError::TrainingDataError {
            message: format!(
                "row {}, column '{}': '{}' is not a finite number",
                line + 1,
                column,
                raw
            ),
        }),
    }
}

fn sample(rng: &mut StdRng, spec: &FeatureSpec) -> f64 {
    let value = rng.gen_range(spec.min..=spec.max);
    if spec.integer {
        value.round()
    } else {
        value
    }
}

fn synthetic_label(kind: AssessmentKind, row: &[f64]) -> bool {
    match kind {
        AssessmentKind::Diabetes => {
            let input = DiabetesInput {
                pregnancies: row[0] as u32,
                glucose: row[1] as u32,
                blood_pressure: row[2] as u32,
                skin_thickness: row[3] as u32,
                insulin: row[4] as u32,
                bmi: row[5],
                diabetes_pedigree: row[6],
                age: row[7] as u32,
            };
            diabetes_score(&input).score >= SYNTHETIC_POSITIVE_SCORE
        }
        AssessmentKind::Heart => {
            let input = HeartInput {
                age: row[0] as u32,
                sex: row[1] as u8,
                chest_pain: row[2] as u8,
                resting_bp: row[3] as u32,
                cholesterol: row[4] as u32,
                fasting_blood_sugar: row[5] as u8,
                resting_ecg: row[6] as u8,
                max_heart_rate: row[7] as u32,
                exercise_angina: row[8] as u8,
                st_depression: row[9],
                slope: row[10] as u8,
                major_vessels: row[11] as u8,
                thal: row[12] as u8,
            };
            heart_score(&input).score >= SYNTHETIC_POSITIVE_SCORE
        }
        // Elevated jitter or a high pitch period entropy
        AssessmentKind::Parkinsons => row[3] > 0.0065 || row[21] > 0.3,
    }
}
