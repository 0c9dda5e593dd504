//! Fixed weighted rules. Every function here is pure: the same input always
//! yields the same score, and the score never leaves `0..=max`.

use crate::domain::model::{DiabetesInput, HeartInput};
use crate::domain::profile::{
    ActivityLevel, AlcoholUse, DietQuality, LifestyleInput, Smoking, StressLevel,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLINICAL_MAX_SCORE: u32 = 10;
pub const LIFESTYLE_MAX_SCORE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.3 {
            RiskLevel::Low
        } else if ratio < 0.6 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub label: String,       // e.g. "Glucose", "Smoking"
    pub points: u32,
    pub description: String, // e.g. "156 mg/dl >= 140"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub max: u32,
    pub level: RiskLevel,
    pub breakdown: Vec<RuleHit>,
}

struct ScoreCard {
    max: u32,
    hits: Vec<RuleHit>,
}

impl ScoreCard {
    fn new(max: u32) -> Self {
        Self {
            max,
            hits: Vec::new(),
        }
    }

    fn add(&mut self, label: &str, points: u32, description: impl Into<String>) {
        if points == 0 {
            return;
        }
        self.hits.push(RuleHit {
            label: label.to_string(),
            points,
            description: description.into(),
        });
    }

    fn finish(self) -> ScoreResult {
        let total: u32 = self.hits.iter().map(|h| h.points).sum();
        let score = total.min(self.max);
        ScoreResult {
            score,
            max: self.max,
            level: RiskLevel::from_ratio(score as f64 / self.max as f64),
            breakdown: self.hits,
        }
    }
}

/// Tiered points: the first threshold the value reaches wins.
fn tier<T: PartialOrd + Copy>(value: T, tiers: &[(T, u32)]) -> Option<(T, u32)> {
    tiers.iter().copied().find(|(threshold, _)| value >= *threshold)
}

pub fn diabetes_score(input: &DiabetesInput) -> ScoreResult {
    let mut card = ScoreCard::new(CLINICAL_MAX_SCORE);

    if let Some((threshold, points)) = tier(input.glucose, &[(140, 3), (100, 1)]) {
        card.add("Glucose", points, format!("{} mg/dl >= {}", input.glucose, threshold));
    }
    if let Some((threshold, points)) = tier(input.bmi, &[(30.0, 2), (25.0, 1)]) {
        card.add("BMI", points, format!("{:.1} >= {}", input.bmi, threshold));
    }
    if let Some((threshold, points)) = tier(input.age, &[(65, 2), (45, 1)]) {
        card.add("Age", points, format!("{} years >= {}", input.age, threshold));
    }
    if input.diabetes_pedigree >= 0.8 {
        card.add(
            "Family history",
            1,
            format!("pedigree {:.2} >= 0.8", input.diabetes_pedigree),
        );
    }
    if input.blood_pressure >= 90 {
        card.add(
            "Blood pressure",
            1,
            format!("{} mm Hg diastolic >= 90", input.blood_pressure),
        );
    }
    if input.pregnancies >= 6 {
        card.add("Pregnancies", 1, format!("{} >= 6", input.pregnancies));
    }

    card.finish()
}

pub fn heart_score(input: &HeartInput) -> ScoreResult {
    let mut card = ScoreCard::new(CLINICAL_MAX_SCORE);

    if let Some((threshold, points)) = tier(input.age, &[(65, 2), (55, 1)]) {
        card.add("Age", points, format!("{} years >= {}", input.age, threshold));
    }
    if input.is_male() {
        card.add("Sex", 1, "male");
    }
    if input.chest_pain > 0 {
        card.add("Chest pain", 1, format!("type {}", input.chest_pain));
    }
    if input.resting_bp >= 140 {
        card.add(
            "Resting blood pressure",
            1,
            format!("{} mm Hg >= 140", input.resting_bp),
        );
    }
    if input.cholesterol >= 240 {
        card.add(
            "Cholesterol",
            1,
            format!("{} mg/dl >= 240", input.cholesterol),
        );
    }
    if input.fasting_blood_sugar == 1 {
        card.add("Fasting blood sugar", 1, "> 120 mg/dl");
    }
    if input.exercise_angina == 1 {
        card.add("Exercise angina", 1, "present");
    }
    if input.st_depression >= 2.0 {
        card.add(
            "ST depression",
            1,
            format!("{:.1} >= 2.0", input.st_depression),
        );
    }
    if input.major_vessels >= 1 {
        card.add(
            "Major vessels",
            1,
            format!("{} colored by fluoroscopy", input.major_vessels),
        );
    }

    card.finish()
}

pub fn lifestyle_score(input: &LifestyleInput) -> ScoreResult {
    let mut card = ScoreCard::new(LIFESTYLE_MAX_SCORE);

    if let Some((threshold, points)) = tier(input.age, &[(65, 3), (45, 2), (30, 1)]) {
        card.add("Age", points, format!("{} years >= {}", input.age, threshold));
    }

    let bmi = input.bmi();
    if let Some((threshold, points)) = tier(bmi, &[(30.0, 3), (25.0, 2)]) {
        card.add("BMI", points, format!("{:.1} >= {}", bmi, threshold));
    } else if bmi < 18.5 {
        card.add("BMI", 1, format!("{:.1} < 18.5", bmi));
    }

    let smoking = match input.smoking {
        Smoking::Current => 4,
        Smoking::Former => 2,
        Smoking::Never => 0,
    };
    card.add("Smoking", smoking, input.smoking.to_string());

    let activity = match input.activity_level {
        ActivityLevel::Sedentary => 3,
        ActivityLevel::LightlyActive => 2,
        ActivityLevel::ModeratelyActive => 1,
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => 0,
    };
    card.add("Activity", activity, input.activity_level.to_string());

    let alcohol = match input.alcohol {
        AlcoholUse::Heavy => 3,
        AlcoholUse::Moderate => 1,
        AlcoholUse::Never => 0,
    };
    card.add("Alcohol", alcohol, input.alcohol.to_string());

    if input.sleep_hours < 6.0 || input.sleep_hours > 9.0 {
        card.add(
            "Sleep",
            2,
            format!("{}h outside 6-9h", input.sleep_hours),
        );
    } else if input.sleep_hours < 7.0 {
        card.add("Sleep", 1, format!("{}h < 7h", input.sleep_hours));
    }

    if input.family_history {
        card.add("Family history", 3, "reported");
    }

    let stress = match input.stress {
        StressLevel::High => 2,
        StressLevel::Medium => 1,
        StressLevel::Low => 0,
    };
    card.add("Stress", stress, input.stress.to_string());

    let diet = match input.diet_quality {
        DietQuality::Poor => 2,
        DietQuality::Average => 1,
        DietQuality::Good => 0,
    };
    card.add("Diet", diet, input.diet_quality.to_string());

    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worst_diabetes() -> DiabetesInput {
        DiabetesInput {
            pregnancies: 17,
            glucose: 199,
            blood_pressure: 122,
            skin_thickness: 99,
            insulin: 846,
            bmi: 67.1,
            diabetes_pedigree: 2.42,
            age: 81,
        }
    }

    fn healthy_diabetes() -> DiabetesInput {
        DiabetesInput {
            pregnancies: 0,
            glucose: 85,
            blood_pressure: 66,
            skin_thickness: 29,
            insulin: 0,
            bmi: 22.0,
            diabetes_pedigree: 0.35,
            age: 31,
        }
    }

    fn worst_heart() -> HeartInput {
        HeartInput {
            age: 77,
            sex: 1,
            chest_pain: 3,
            resting_bp: 200,
            cholesterol: 564,
            fasting_blood_sugar: 1,
            resting_ecg: 2,
            max_heart_rate: 71,
            exercise_angina: 1,
            st_depression: 6.2,
            slope: 2,
            major_vessels: 4,
            thal: 3,
        }
    }

    fn worst_lifestyle() -> LifestyleInput {
        LifestyleInput {
            age: 70,
            height_cm: 160.0,
            weight_kg: 110.0,
            smoking: Smoking::Current,
            activity_level: ActivityLevel::Sedentary,
            alcohol: AlcoholUse::Heavy,
            sleep_hours: 4.0,
            family_history: true,
            stress: StressLevel::High,
            diet_quality: DietQuality::Poor,
        }
    }

    #[test]
    fn test_diabetes_extremes_hit_bounds() {
        let worst = diabetes_score(&worst_diabetes());
        assert_eq!(worst.score, CLINICAL_MAX_SCORE);
        assert_eq!(worst.level, RiskLevel::High);

        let healthy = diabetes_score(&healthy_diabetes());
        assert_eq!(healthy.score, 0);
        assert_eq!(healthy.level, RiskLevel::Low);
        assert!(healthy.breakdown.is_empty());
    }

    #[test]
    fn test_diabetes_tiers() {
        let mut input = healthy_diabetes();
        input.glucose = 120;
        input.bmi = 31.0;
        input.age = 50;
        let result = diabetes_score(&input);
        // glucose +1, bmi +2, age +1
        assert_eq!(result.score, 4);
        assert_eq!(result.level, RiskLevel::Moderate);
        assert_eq!(result.breakdown.len(), 3);
        assert_eq!(result.breakdown[1].label, "BMI");
        assert_eq!(result.breakdown[1].points, 2);
    }

    #[test]
    fn test_heart_extremes_hit_bounds() {
        assert_eq!(heart_score(&worst_heart()).score, CLINICAL_MAX_SCORE);

        let mut mild = worst_heart();
        mild.age = 40;
        mild.sex = 0;
        mild.chest_pain = 0;
        mild.resting_bp = 120;
        mild.cholesterol = 180;
        mild.fasting_blood_sugar = 0;
        mild.exercise_angina = 0;
        mild.st_depression = 0.5;
        mild.major_vessels = 0;
        assert_eq!(heart_score(&mild).score, 0);
    }

    #[test]
    fn test_lifestyle_extremes_hit_bounds() {
        let worst = lifestyle_score(&worst_lifestyle());
        assert_eq!(worst.score, LIFESTYLE_MAX_SCORE);

        let best = LifestyleInput {
            age: 25,
            height_cm: 175.0,
            weight_kg: 68.0,
            smoking: Smoking::Never,
            activity_level: ActivityLevel::VeryActive,
            alcohol: AlcoholUse::Never,
            sleep_hours: 8.0,
            family_history: false,
            stress: StressLevel::Low,
            diet_quality: DietQuality::Good,
        };
        let result = lifestyle_score(&best);
        assert_eq!(result.score, 0);
        assert_eq!(result.max, LIFESTYLE_MAX_SCORE);
    }

    #[test]
    fn test_underweight_and_short_sleep() {
        let mut input = worst_lifestyle();
        input.weight_kg = 40.0; // BMI 15.6
        input.sleep_hours = 6.5;
        let result = lifestyle_score(&input);
        let bmi = result.breakdown.iter().find(|h| h.label == "BMI").unwrap();
        assert_eq!(bmi.points, 1);
        let sleep = result.breakdown.iter().find(|h| h.label == "Sleep").unwrap();
        assert_eq!(sleep.points, 1);
    }

    #[test]
    fn test_scores_are_deterministic() {
        let input = worst_lifestyle();
        let first = lifestyle_score(&input);
        for _ in 0..10 {
            assert_eq!(lifestyle_score(&input), first);
        }
        assert_eq!(
            diabetes_score(&healthy_diabetes()),
            diabetes_score(&healthy_diabetes())
        );
    }

    #[test]
    fn test_scores_stay_in_bounds_across_grid() {
        for age in [21u32, 45, 65, 81] {
            for glucose in [0u32, 100, 140, 199] {
                for bmi in [0.0, 25.0, 30.0, 67.1] {
                    let mut input = worst_diabetes();
                    input.age = age;
                    input.glucose = glucose;
                    input.bmi = bmi;
                    let result = diabetes_score(&input);
                    assert!(result.score <= CLINICAL_MAX_SCORE);
                }
            }
        }
    }

    fn assert_consistent(result: &ScoreResult, max: u32) {
        let total: u32 = result.breakdown.iter().map(|h| h.points).sum();
        assert_eq!(result.max, max);
        assert!(result.score <= max);
        assert_eq!(result.score, total.min(max));
    }

    #[test]
    fn test_heart_scores_stay_in_bounds_across_grid() {
        for age in [29u32, 55, 65, 77] {
            for sex in [0u8, 1] {
                for chest_pain in [0u8, 3] {
                    for resting_bp in [94u32, 140, 200] {
                        for st_depression in [0.0, 2.0, 6.2] {
                            for major_vessels in [0u8, 1, 4] {
                                let mut input = worst_heart();
                                input.age = age;
                                input.sex = sex;
                                input.chest_pain = chest_pain;
                                input.resting_bp = resting_bp;
                                input.st_depression = st_depression;
                                input.major_vessels = major_vessels;
                                assert_consistent(&heart_score(&input), CLINICAL_MAX_SCORE);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_lifestyle_scores_stay_in_bounds_across_grid() {
        let smoking = [Smoking::Never, Smoking::Former, Smoking::Current];
        let activity = [
            ActivityLevel::Sedentary,
            ActivityLevel::LightlyActive,
            ActivityLevel::ModeratelyActive,
            ActivityLevel::VeryActive,
            ActivityLevel::ExtremelyActive,
        ];
        let alcohol = [AlcoholUse::Never, AlcoholUse::Moderate, AlcoholUse::Heavy];

        for age in [10u32, 30, 45, 65, 100] {
            for weight_kg in [20.0, 50.0, 80.0, 300.0] {
                for sleep_hours in [0.0, 6.5, 8.0, 24.0] {
                    for &smoking in &smoking {
                        for &activity_level in &activity {
                            for &alcohol in &alcohol {
                                for family_history in [false, true] {
                                    let input = LifestyleInput {
                                        age,
                                        height_cm: 170.0,
                                        weight_kg,
                                        smoking,
                                        activity_level,
                                        alcohol,
                                        sleep_hours,
                                        family_history,
                                        stress: StressLevel::High,
                                        diet_quality: DietQuality::Poor,
                                    };
                                    assert_consistent(
                                        &lifestyle_score(&input),
                                        LIFESTYLE_MAX_SCORE,
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
