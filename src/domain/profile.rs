use crate::utils::error::Result;
use crate::utils::validation::{validate_input, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body mass index from weight in kilograms and height in centimetres.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 {
        return 0.0;
    }
    weight_kg / (height_m * height_m)
}

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let label = match self {
                    $($name::$variant => $label),+
                };
                f.write_str(label)
            }
        }
    };
}

labelled_enum!(Sex {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

labelled_enum!(ActivityLevel {
    Sedentary => "Sedentary",
    LightlyActive => "Lightly Active",
    ModeratelyActive => "Moderately Active",
    VeryActive => "Very Active",
    ExtremelyActive => "Extremely Active",
});

labelled_enum!(DietaryPreference {
    Vegetarian => "Vegetarian",
    Keto => "Keto",
    GlutenFree => "Gluten Free",
    LowCarb => "Low Carb",
    DairyFree => "Dairy Free",
    Mediterranean => "Mediterranean",
    Standard => "Standard",
});

labelled_enum!(FitnessGoal {
    LoseWeight => "Lose Weight",
    GainMuscle => "Gain Muscle",
    Endurance => "Endurance",
    StayFit => "Stay Fit",
    StrengthTraining => "Strength Training",
    GeneralHealth => "General Health",
});

labelled_enum!(Smoking {
    Never => "Never",
    Former => "Former",
    Current => "Current",
});

labelled_enum!(AlcoholUse {
    Never => "None",
    Moderate => "Moderate",
    Heavy => "Heavy",
});

labelled_enum!(StressLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

labelled_enum!(DietQuality {
    Good => "Good",
    Average => "Average",
    Poor => "Poor",
});

/// Profile used to request a personalized diet and fitness plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub dietary_preference: DietaryPreference,
    pub fitness_goal: FitnessGoal,
}

impl HealthProfile {
    /// Multi-line profile block embedded in every plan prompt.
    pub fn describe(&self) -> String {
        format!(
            "Age: {}\nWeight: {}kg\nHeight: {}cm\nSex: {}\nActivity Level: {}\nDietary Preferences: {}\nFitness Goals: {}",
            self.age,
            self.weight_kg,
            self.height_cm,
            self.sex,
            self.activity_level,
            self.dietary_preference,
            self.fitness_goal
        )
    }
}

impl Validate for HealthProfile {
    fn validate(&self) -> Result<()> {
        validate_input("age", self.age, 10, 100)?;
        validate_input("weight_kg", self.weight_kg, 20.0, 300.0)?;
        validate_input("height_cm", self.height_cm, 100.0, 250.0)?;
        Ok(())
    }
}

/// Demographic and lifestyle answers scored by the lifestyle heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleInput {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub smoking: Smoking,
    pub activity_level: ActivityLevel,
    pub alcohol: AlcoholUse,
    pub sleep_hours: f64,
    pub family_history: bool,
    pub stress: StressLevel,
    pub diet_quality: DietQuality,
}

impl LifestyleInput {
    pub fn bmi(&self) -> f64 {
        bmi(self.weight_kg, self.height_cm)
    }

    pub fn summary(&self) -> String {
        format!(
            "Age={}, BMI={:.1}, Smoking={}, Activity Level={}, Alcohol={}, Sleep={}h, Family History={}, Stress={}, Diet Quality={}",
            self.age,
            self.bmi(),
            self.smoking,
            self.activity_level,
            self.alcohol,
            self.sleep_hours,
            if self.family_history { "Yes" } else { "No" },
            self.stress,
            self.diet_quality
        )
    }
}

impl Validate for LifestyleInput {
    fn validate(&self) -> Result<()> {
        validate_input("age", self.age, 10, 100)?;
        validate_input("height_cm", self.height_cm, 100.0, 250.0)?;
        validate_input("weight_kg", self.weight_kg, 20.0, 300.0)?;
        validate_input("sleep_hours", self.sleep_hours, 0.0, 24.0)?;
        Ok(())
    }
}
