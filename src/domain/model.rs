use crate::utils::error::Result;
use crate::utils::validation::{validate_input, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column name and inclusive bounds of one model feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    /// Whole-number field (counts, codes, mg/dl readings).
    pub integer: bool,
}

const fn feature(name: &'static str, min: f64, max: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        min,
        max,
        integer: false,
    }
}

const fn discrete(name: &'static str, min: f64, max: f64) -> FeatureSpec {
    FeatureSpec {
        name,
        min,
        max,
        integer: true,
    }
}

pub const DIABETES_FEATURES: [FeatureSpec; 8] = [
    discrete("Pregnancies", 0.0, 17.0),
    discrete("Glucose", 0.0, 199.0),
    discrete("BloodPressure", 0.0, 122.0),
    discrete("SkinThickness", 0.0, 99.0),
    discrete("Insulin", 0.0, 846.0),
    feature("BMI", 0.0, 67.1),
    feature("DiabetesPedigreeFunction", 0.0, 2.42),
    discrete("Age", 21.0, 81.0),
];

pub const HEART_FEATURES: [FeatureSpec; 13] = [
    discrete("age", 29.0, 77.0),
    discrete("sex", 0.0, 1.0),
    discrete("cp", 0.0, 3.0),
    discrete("trestbps", 94.0, 200.0),
    discrete("chol", 126.0, 564.0),
    discrete("fbs", 0.0, 1.0),
    discrete("restecg", 0.0, 2.0),
    discrete("thalach", 71.0, 202.0),
    discrete("exang", 0.0, 1.0),
    feature("oldpeak", 0.0, 6.2),
    discrete("slope", 0.0, 2.0),
    discrete("ca", 0.0, 4.0),
    discrete("thal", 0.0, 3.0),
];

// The first five are entered by the user; the rest come from PARKINSONS_DEFAULTS.
pub const PARKINSONS_FEATURES: [FeatureSpec; 22] = [
    feature("MDVP:Fo(Hz)", 88.33, 260.10),
    feature("MDVP:Fhi(Hz)", 102.14, 592.03),
    feature("MDVP:Flo(Hz)", 65.47, 239.17),
    feature("MDVP:Jitter(%)", 0.00168, 0.03316),
    feature("MDVP:Jitter(Abs)", 0.000007, 0.00261),
    feature("MDVP:RAP", 0.00068, 0.02144),
    feature("MDVP:PPQ", 0.00092, 0.01958),
    feature("Jitter:DDP", 0.00204, 0.06433),
    feature("MDVP:Shimmer", 0.00954, 0.11908),
    feature("MDVP:Shimmer(dB)", 0.085, 1.302),
    feature("Shimmer:APQ3", 0.00455, 0.05647),
    feature("Shimmer:APQ5", 0.0057, 0.0794),
    feature("MDVP:APQ", 0.00719, 0.13778),
    feature("Shimmer:DDA", 0.01364, 0.16942),
    feature("NHR", 0.00065, 0.31482),
    feature("HNR", 8.441, 33.047),
    feature("RPDE", 0.25657, 0.685151),
    feature("DFA", 0.574282, 0.825288),
    feature("spread1", -7.964984, -2.434031),
    feature("spread2", 0.006274, 0.450493),
    feature("D2", 1.423287, 3.671155),
    feature("PPE", 0.044539, 0.527367),
];

/// Fixed values for the 17 voice measurements the user is not asked for.
pub const PARKINSONS_DEFAULTS: [f64; 17] = [
    0.003, 0.003, 0.009, 0.029, 0.282, 0.017, 0.020, 0.024, 0.047, 0.025, 21.9, 0.499, 0.718,
    -5.68, 0.227, 2.38, 0.207,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Diabetes,
    Heart,
    Parkinsons,
}

impl AssessmentKind {
    pub const ALL: [AssessmentKind; 3] = [
        AssessmentKind::Diabetes,
        AssessmentKind::Heart,
        AssessmentKind::Parkinsons,
    ];

    pub fn features(&self) -> &'static [FeatureSpec] {
        match self {
            AssessmentKind::Diabetes => &DIABETES_FEATURES,
            AssessmentKind::Heart => &HEART_FEATURES,
            AssessmentKind::Parkinsons => &PARKINSONS_FEATURES,
        }
    }

    /// Label column used by the public datasets for each model.
    pub fn label_column(&self) -> &'static str {
        match self {
            AssessmentKind::Diabetes => "Outcome",
            AssessmentKind::Heart => "target",
            AssessmentKind::Parkinsons => "status",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AssessmentKind::Diabetes => "diabetes",
            AssessmentKind::Heart => "heart",
            AssessmentKind::Parkinsons => "parkinsons",
        }
    }

    pub fn model_file_name(&self) -> String {
        format!("{}_model.json", self.slug())
    }

    pub fn diagnosis(&self, positive: bool) -> &'static str {
        match (self, positive) {
            (AssessmentKind::Diabetes, true) => "The person is diabetic",
            (AssessmentKind::Diabetes, false) => "The person is not diabetic",
            (AssessmentKind::Heart, true) => "The person is having heart disease",
            (AssessmentKind::Heart, false) => "The person does not have any heart disease",
            (AssessmentKind::Parkinsons, true) => "The person has Parkinson's disease",
            (AssessmentKind::Parkinsons, false) => {
                "The person does not have Parkinson's disease"
            }
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssessmentKind::Diabetes => "Diabetes",
            AssessmentKind::Heart => "Heart Disease",
            AssessmentKind::Parkinsons => "Parkinson's Disease",
        };
        f.write_str(name)
    }
}

/// Values collected for one clinical assessment.
pub trait ClinicalInput: Validate {
    fn kind(&self) -> AssessmentKind;

    /// Feature vector in the order of `kind().features()`.
    fn features(&self) -> Vec<f64>;

    /// One-line description of the entered values, used in prompts.
    fn summary(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiabetesInput {
    pub pregnancies: u32,
    pub glucose: u32,
    pub blood_pressure: u32,
    pub skin_thickness: u32,
    pub insulin: u32,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: u32,
}

impl Validate for DiabetesInput {
    fn validate(&self) -> Result<()> {
        validate_input("pregnancies", self.pregnancies, 0, 17)?;
        validate_input("glucose", self.glucose, 0, 199)?;
        validate_input("blood_pressure", self.blood_pressure, 0, 122)?;
        validate_input("skin_thickness", self.skin_thickness, 0, 99)?;
        validate_input("insulin", self.insulin, 0, 846)?;
        validate_input("bmi", self.bmi, 0.0, 67.1)?;
        validate_input("diabetes_pedigree", self.diabetes_pedigree, 0.0, 2.42)?;
        validate_input("age", self.age, 21, 81)?;
        Ok(())
    }
}

impl ClinicalInput for DiabetesInput {
    fn kind(&self) -> AssessmentKind {
        AssessmentKind::Diabetes
    }

    fn features(&self) -> Vec<f64> {
        vec![
            self.pregnancies as f64,
            self.glucose as f64,
            self.blood_pressure as f64,
            self.skin_thickness as f64,
            self.insulin as f64,
            self.bmi,
            self.diabetes_pedigree,
            self.age as f64,
        ]
    }

    fn summary(&self) -> String {
        format!(
            "Pregnancies={}, Glucose={}, Blood Pressure={}, Skin Thickness={}, Insulin={}, BMI={}, Diabetes Pedigree Function={}, Age={}",
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree,
            self.age
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartInput {
    pub age: u32,
    /// 0 = female, 1 = male
    pub sex: u8,
    pub chest_pain: u8,
    pub resting_bp: u32,
    pub cholesterol: u32,
    pub fasting_blood_sugar: u8,
    pub resting_ecg: u8,
    pub max_heart_rate: u32,
    pub exercise_angina: u8,
    pub st_depression: f64,
    pub slope: u8,
    pub major_vessels: u8,
    pub thal: u8,
}

impl HeartInput {
    pub fn is_male(&self) -> bool {
        self.sex == 1
    }
}

impl Validate for HeartInput {
    fn validate(&self) -> Result<()> {
        validate_input("age", self.age, 29, 77)?;
        validate_input("sex", self.sex, 0, 1)?;
        validate_input("chest_pain", self.chest_pain, 0, 3)?;
        validate_input("resting_bp", self.resting_bp, 94, 200)?;
        validate_input("cholesterol", self.cholesterol, 126, 564)?;
        validate_input("fasting_blood_sugar", self.fasting_blood_sugar, 0, 1)?;
        validate_input("resting_ecg", self.resting_ecg, 0, 2)?;
        validate_input("max_heart_rate", self.max_heart_rate, 71, 202)?;
        validate_input("exercise_angina", self.exercise_angina, 0, 1)?;
        validate_input("st_depression", self.st_depression, 0.0, 6.2)?;
        validate_input("slope", self.slope, 0, 2)?;
        validate_input("major_vessels", self.major_vessels, 0, 4)?;
        validate_input("thal", self.thal, 0, 3)?;
        Ok(())
    }
}

impl ClinicalInput for HeartInput {
    fn kind(&self) -> AssessmentKind {
        AssessmentKind::Heart
    }

    fn features(&self) -> Vec<f64> {
        vec![
            self.age as f64,
            self.sex as f64,
            self.chest_pain as f64,
            self.resting_bp as f64,
            self.cholesterol as f64,
            self.fasting_blood_sugar as f64,
            self.resting_ecg as f64,
            self.max_heart_rate as f64,
            self.exercise_angina as f64,
            self.st_depression,
            self.slope as f64,
            self.major_vessels as f64,
            self.thal as f64,
        ]
    }

    fn summary(&self) -> String {
        format!(
            "Age={}, Sex={}, Chest Pain Type={}, Resting BP={}, Cholesterol={}, Fasting Blood Sugar={}, Resting ECG={}, Max Heart Rate={}, Exercise Angina={}, ST Depression={}, Slope={}, Major Vessels={}, Thal={}",
            self.age,
            if self.is_male() { "Male" } else { "Female" },
            self.chest_pain,
            self.resting_bp,
            self.cholesterol,
            self.fasting_blood_sugar,
            self.resting_ecg,
            self.max_heart_rate,
            self.exercise_angina,
            self.st_depression,
            self.slope,
            self.major_vessels,
            self.thal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkinsonsInput {
    /// Average vocal fundamental frequency (Hz)
    pub fo: f64,
    /// Maximum vocal fundamental frequency (Hz)
    pub fhi: f64,
    /// Minimum vocal fundamental frequency (Hz)
    pub flo: f64,
    pub jitter_percent: f64,
    pub jitter_abs: f64,
}

impl Validate for ParkinsonsInput {
    fn validate(&self) -> Result<()> {
        let specs = &PARKINSONS_FEATURES;
        validate_input("fo", self.fo, specs[0].min, specs[0].max)?;
        validate_input("fhi", self.fhi, specs[1].min, specs[1].max)?;
        validate_input("flo", self.flo, specs[2].min, specs[2].max)?;
        validate_input("jitter_percent", self.jitter_percent, specs[3].min, specs[3].max)?;
        validate_input("jitter_abs", self.jitter_abs, specs[4].min, specs[4].max)?;
        Ok(())
    }
}

impl ClinicalInput for ParkinsonsInput {
    fn kind(&self) -> AssessmentKind {
        AssessmentKind::Parkinsons
    }

    fn features(&self) -> Vec<f64> {
        let mut features = vec![
            self.fo,
            self.fhi,
            self.flo,
            self.jitter_percent,
            self.jitter_abs,
        ];
        features.extend_from_slice(&PARKINSONS_DEFAULTS);
        features
    }

    fn summary(&self) -> String {
        format!(
            "Fundamental frequency (average={}, max={}, min={}), Jitter percentage={}, Absolute jitter={}",
            self.fo, self.fhi, self.flo, self.jitter_percent, self.jitter_abs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diabetes() -> DiabetesInput {
        DiabetesInput {
            pregnancies: 2,
            glucose: 120,
            blood_pressure: 70,
            skin_thickness: 20,
            insulin: 80,
            bmi: 28.5,
            diabetes_pedigree: 0.5,
            age: 40,
        }
    }

    #[test]
    fn test_feature_vectors_match_feature_tables() {
        for kind in AssessmentKind::ALL {
            assert!(!kind.features().is_empty());
        }
        assert_eq!(diabetes().features().len(), DIABETES_FEATURES.len());

        let parkinsons = ParkinsonsInput {
            fo: 119.992,
            fhi: 157.302,
            flo: 74.997,
            jitter_percent: 0.00784,
            jitter_abs: 0.00007,
        };
        let features = parkinsons.features();
        assert_eq!(features.len(), PARKINSONS_FEATURES.len());
        assert_eq!(features[5], 0.003);
        assert_eq!(features[21], 0.207);
    }

    #[test]
    fn test_diabetes_validation_bounds() {
        assert!(diabetes().validate().is_ok());

        let mut too_young = diabetes();
        too_young.age = 18;
        assert!(too_young.validate().is_err());

        let mut high_bmi = diabetes();
        high_bmi.bmi = 70.0;
        assert!(high_bmi.validate().is_err());
    }

    #[test]
    fn test_heart_sex_must_be_binary() {
        let input = HeartInput {
            age: 54,
            sex: 2,
            chest_pain: 0,
            resting_bp: 130,
            cholesterol: 240,
            fasting_blood_sugar: 0,
            resting_ecg: 1,
            max_heart_rate: 150,
            exercise_angina: 0,
            st_depression: 1.0,
            slope: 1,
            major_vessels: 0,
            thal: 2,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_diagnosis_text() {
        assert_eq!(
            AssessmentKind::Heart.diagnosis(false),
            "The person does not have any heart disease"
        );
        assert_eq!(
            AssessmentKind::Diabetes.model_file_name(),
            "diabetes_model.json"
        );
    }

    #[test]
    fn test_model_file_named_after_kind() {
        for kind in AssessmentKind::ALL {
            let name = serde_json::to_value(kind).unwrap();
            assert_eq!(
                kind.model_file_name(),
                format!("{}_model.json", name.as_str().unwrap())
            );
        }
        assert_eq!(AssessmentKind::Heart.model_file_name(), "heart_model.json");
    }
}
