use crate::domain::model::{AssessmentKind, DiabetesInput, HeartInput, ParkinsonsInput};
use crate::domain::profile::{
    ActivityLevel, AlcoholUse, DietQuality, DietaryPreference, FitnessGoal, HealthProfile,
    LifestyleInput, Sex, Smoking, StressLevel,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "health-copilot")]
#[command(about = "Health self-assessment: heuristic risk scores, toy classifiers and AI explanations")]
pub struct Cli {
    /// Path to TOML configuration file (default: ./copilot.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Skip the AI explanation even when an API key is configured
    #[arg(long, global = true)]
    pub no_explain: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diabetes prediction from clinical measurements
    Diabetes(DiabetesArgs),
    /// Heart disease prediction from clinical measurements
    Heart(HeartArgs),
    /// Parkinson's prediction from voice measurements
    Parkinsons(ParkinsonsArgs),
    /// Lifestyle risk score (0-25)
    Lifestyle(LifestyleArgs),
    /// Personalized diet, fitness plan and tips (requires an API key)
    Plan(PlanArgs),
    /// Retrain cached models (all when none given)
    Train {
        #[arg(value_enum)]
        kinds: Vec<AssessmentKind>,
    },
    /// Validate the setup
    Doctor,
}

#[derive(Debug, Clone, Args)]
pub struct DiabetesArgs {
    /// Number of times pregnant (0-17)
    #[arg(long)]
    pub pregnancies: u32,
    /// Plasma glucose concentration (0-199)
    #[arg(long)]
    pub glucose: u32,
    /// Diastolic blood pressure in mm Hg (0-122)
    #[arg(long)]
    pub blood_pressure: u32,
    /// Triceps skin fold thickness in mm (0-99)
    #[arg(long)]
    pub skin_thickness: u32,
    /// 2-Hour serum insulin in mu U/ml (0-846)
    #[arg(long)]
    pub insulin: u32,
    /// Body mass index (0-67.1)
    #[arg(long)]
    pub bmi: f64,
    /// Diabetes pedigree function (0-2.42)
    #[arg(long)]
    pub pedigree: f64,
    /// Age in years (21-81)
    #[arg(long)]
    pub age: u32,
}

impl From<DiabetesArgs> for DiabetesInput {
    fn from(args: DiabetesArgs) -> Self {
        Self {
            pregnancies: args.pregnancies,
            glucose: args.glucose,
            blood_pressure: args.blood_pressure,
            skin_thickness: args.skin_thickness,
            insulin: args.insulin,
            bmi: args.bmi,
            diabetes_pedigree: args.pedigree,
            age: args.age,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct HeartArgs {
    /// Age in years (29-77)
    #[arg(long)]
    pub age: u32,
    /// 0 = female, 1 = male
    #[arg(long)]
    pub sex: u8,
    /// Chest pain type (0-3)
    #[arg(long)]
    pub cp: u8,
    /// Resting blood pressure (94-200)
    #[arg(long)]
    pub trestbps: u32,
    /// Serum cholesterol in mg/dl (126-564)
    #[arg(long)]
    pub chol: u32,
    /// Fasting blood sugar > 120 mg/dl (0/1)
    #[arg(long)]
    pub fbs: u8,
    /// Resting electrocardiographic results (0-2)
    #[arg(long)]
    pub restecg: u8,
    /// Maximum heart rate achieved (71-202)
    #[arg(long)]
    pub thalach: u32,
    /// Exercise induced angina (0/1)
    #[arg(long)]
    pub exang: u8,
    /// ST depression induced by exercise (0-6.2)
    #[arg(long)]
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment (0-2)
    #[arg(long)]
    pub slope: u8,
    /// Major vessels colored by fluoroscopy (0-4)
    #[arg(long)]
    pub ca: u8,
    /// 0 = normal, 1 = fixed defect, 2 = reversible defect
    #[arg(long)]
    pub thal: u8,
}

impl From<HeartArgs> for HeartInput {
    fn from(args: HeartArgs) -> Self {
        Self {
            age: args.age,
            sex: args.sex,
            chest_pain: args.cp,
            resting_bp: args.trestbps,
            cholesterol: args.chol,
            fasting_blood_sugar: args.fbs,
            resting_ecg: args.restecg,
            max_heart_rate: args.thalach,
            exercise_angina: args.exang,
            st_depression: args.oldpeak,
            slope: args.slope,
            major_vessels: args.ca,
            thal: args.thal,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ParkinsonsArgs {
    /// Average vocal fundamental frequency in Hz (88.33-260.10)
    #[arg(long)]
    pub fo: f64,
    /// Maximum vocal fundamental frequency in Hz (102.14-592.03)
    #[arg(long)]
    pub fhi: f64,
    /// Minimum vocal fundamental frequency in Hz (65.47-239.17)
    #[arg(long)]
    pub flo: f64,
    /// Jitter percentage (0.00168-0.03316)
    #[arg(long)]
    pub jitter_percent: f64,
    /// Absolute jitter (0.000007-0.00261)
    #[arg(long)]
    pub jitter_abs: f64,
}

impl From<ParkinsonsArgs> for ParkinsonsInput {
    fn from(args: ParkinsonsArgs) -> Self {
        Self {
            fo: args.fo,
            fhi: args.fhi,
            flo: args.flo,
            jitter_percent: args.jitter_percent,
            jitter_abs: args.jitter_abs,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct LifestyleArgs {
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub height_cm: f64,
    #[arg(long)]
    pub weight_kg: f64,
    #[arg(long, value_enum, default_value_t = Smoking::Never)]
    pub smoking: Smoking,
    #[arg(long, value_enum, default_value_t = ActivityLevel::ModeratelyActive)]
    pub activity: ActivityLevel,
    #[arg(long, value_enum, default_value_t = AlcoholUse::Never)]
    pub alcohol: AlcoholUse,
    /// Average hours of sleep per night
    #[arg(long, default_value_t = 7.5)]
    pub sleep_hours: f64,
    /// A parent or sibling has heart disease or diabetes
    #[arg(long)]
    pub family_history: bool,
    #[arg(long, value_enum, default_value_t = StressLevel::Low)]
    pub stress: StressLevel,
    #[arg(long, value_enum, default_value_t = DietQuality::Average)]
    pub diet: DietQuality,
}

impl From<LifestyleArgs> for LifestyleInput {
    fn from(args: LifestyleArgs) -> Self {
        Self {
            age: args.age,
            height_cm: args.height_cm,
            weight_kg: args.weight_kg,
            smoking: args.smoking,
            activity_level: args.activity,
            alcohol: args.alcohol,
            sleep_hours: args.sleep_hours,
            family_history: args.family_history,
            stress: args.stress,
            diet_quality: args.diet,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub weight_kg: f64,
    #[arg(long)]
    pub height_cm: f64,
    #[arg(long, value_enum)]
    pub sex: Sex,
    #[arg(long, value_enum, default_value_t = ActivityLevel::ModeratelyActive)]
    pub activity: ActivityLevel,
    #[arg(long, value_enum, default_value_t = DietaryPreference::Standard)]
    pub diet: DietaryPreference,
    #[arg(long, value_enum, default_value_t = FitnessGoal::GeneralHealth)]
    pub goal: FitnessGoal,
}

impl From<PlanArgs> for HealthProfile {
    fn from(args: PlanArgs) -> Self {
        Self {
            age: args.age,
            weight_kg: args.weight_kg,
            height_cm: args.height_cm,
            sex: args.sex,
            activity_level: args.activity,
            dietary_preference: args.diet,
            fitness_goal: args.goal,
        }
    }
}
