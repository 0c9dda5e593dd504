use anyhow::Result;
use health_copilot::core::dataset::TrainingSource;
use health_copilot::domain::model::{AssessmentKind, DiabetesInput, HeartInput, ParkinsonsInput};
use health_copilot::domain::profile::{
    ActivityLevel, AlcoholUse, DietQuality, DietaryPreference, FitnessGoal, HealthProfile,
    LifestyleInput, Sex, Smoking, StressLevel,
};
use health_copilot::{
    Copilot, CopilotConfig, CopilotError, LocalStorage, ModelStore, OpenRouterClient,
};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;

fn test_config(temp_dir: &TempDir, endpoint: String) -> CopilotConfig {
    let mut config = CopilotConfig::default();
    config.api.endpoint = endpoint;
    config.models.dir = temp_dir.path().to_string_lossy().into_owned();
    config.models.samples = 200;
    config
}

fn copilot(
    config: CopilotConfig,
    api_key: Option<&str>,
) -> Result<Copilot<OpenRouterClient, LocalStorage>> {
    let provider = OpenRouterClient::new(config.api.clone(), api_key.map(str::to_string))?;
    let models = ModelStore::new(LocalStorage::new(config.models.dir.clone()));
    Ok(Copilot::new(provider, models, config))
}

fn completion(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

fn diabetes_input() -> DiabetesInput {
    DiabetesInput {
        pregnancies: 6,
        glucose: 168,
        blood_pressure: 88,
        skin_thickness: 35,
        insulin: 180,
        bmi: 36.4,
        diabetes_pedigree: 0.95,
        age: 54,
    }
}

fn profile() -> HealthProfile {
    HealthProfile {
        age: 41,
        weight_kg: 84.0,
        height_cm: 178.0,
        sex: Sex::Male,
        activity_level: ActivityLevel::LightlyActive,
        dietary_preference: DietaryPreference::Vegetarian,
        fitness_goal: FitnessGoal::LoseWeight,
    }
}

#[tokio::test]
async fn test_diabetes_assessment_trains_caches_and_explains() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains("Diabetes prediction results")
                .body_contains("Glucose=168");
            then.status(200)
                .json_body(completion("Elevated glucose is the main driver."));
        })
        .await;

    let config = test_config(&temp_dir, server.url("/chat/completions"));
    let copilot = copilot(config, Some("sk-or-test"))?;

    let report = copilot.assess_diabetes(&diabetes_input()).await?;
    mock.assert_async().await;

    assert_eq!(report.kind, AssessmentKind::Diabetes);
    assert_eq!(
        report.diagnosis,
        AssessmentKind::Diabetes.diagnosis(report.positive)
    );
    assert_eq!(report.positive, report.decision > 0.0);
    let score = report.score.as_ref().expect("diabetes has a heuristic score");
    assert!(score.score <= score.max);
    assert_eq!(
        report.explanation.as_deref(),
        Some("Elevated glucose is the main driver.")
    );
    assert!(temp_dir.path().join("diabetes_model.json").exists());

    // 第二次直接讀取快取
    let cached = std::fs::read_to_string(temp_dir.path().join("diabetes_model.json"))?;
    let again = copilot.assess_diabetes(&diabetes_input()).await?;
    assert!((again.decision - report.decision).abs() < 1e-9);
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("diabetes_model.json"))?,
        cached
    );
    Ok(())
}

#[tokio::test]
async fn test_parkinsons_has_no_heuristic_score() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(&temp_dir, "http://127.0.0.1:9/chat/completions".to_string());
    let copilot = copilot(config, None)?;

    let report = copilot
        .assess_parkinsons(&ParkinsonsInput {
            fo: 119.99,
            fhi: 157.30,
            flo: 74.99,
            jitter_percent: 0.00784,
            jitter_abs: 0.00007,
        })
        .await?;

    assert!(report.score.is_none());
    assert!(report.explanation.is_none());
    assert!(temp_dir.path().join("parkinsons_model.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_explanations_can_be_disabled() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(completion("unused"));
        })
        .await;

    let config = test_config(&temp_dir, server.url("/chat/completions"));
    let copilot = copilot(config, Some("sk-or-test"))?.with_explanations(false);

    let report = copilot
        .assess_lifestyle(&LifestyleInput {
            age: 28,
            height_cm: 170.0,
            weight_kg: 65.0,
            smoking: Smoking::Never,
            activity_level: ActivityLevel::VeryActive,
            alcohol: AlcoholUse::Never,
            sleep_hours: 8.0,
            family_history: false,
            stress: StressLevel::Low,
            diet_quality: DietQuality::Good,
        })
        .await?;

    assert_eq!(report.score.score, 0);
    assert!(report.explanation.is_none());
    mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_any_call() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(completion("unused"));
        })
        .await;

    let config = test_config(&temp_dir, server.url("/chat/completions"));
    let copilot = copilot(config, Some("sk-or-test"))?;

    let mut input = diabetes_input();
    input.age = 12;
    match copilot.assess_diabetes(&input).await {
        Err(CopilotError::InputError { field, .. }) => assert_eq!(field, "age"),
        other => panic!("expected input error, got {:?}", other),
    }

    mock.assert_hits_async(0).await;
    assert!(!temp_dir.path().join("diabetes_model.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_health_plan_makes_three_independent_calls() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    let dietary = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("nutrition expert");
            then.status(200).json_body(completion("Oats for breakfast."));
        })
        .await;
    let fitness = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("fitness expert");
            then.status(503);
        })
        .await;
    let tips = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("5 quick, practical health tips");
            then.status(200).json_body(completion("Drink water."));
        })
        .await;

    let config = test_config(&temp_dir, server.url("/chat/completions"));
    let copilot = copilot(config, Some("sk-or-test"))?;

    let plan = copilot.health_plan(&profile()).await?;

    dietary.assert_async().await;
    fitness.assert_async().await;
    tips.assert_async().await;
    assert_eq!(plan.dietary, "Oats for breakfast.");
    assert_eq!(plan.fitness, "❌ Error: API request failed with status 503");
    assert_eq!(plan.tips, "Drink water.");
    Ok(())
}

#[tokio::test]
async fn test_health_plan_requires_api_key() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(&temp_dir, "http://127.0.0.1:9/chat/completions".to_string());
    let copilot = copilot(config, None)?;

    let err = copilot.health_plan(&profile()).await.unwrap_err();
    assert!(matches!(err, CopilotError::MissingApiKey));
    Ok(())
}

#[tokio::test]
async fn test_heart_model_trained_from_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("heart.csv");
    let mut file = std::fs::File::create(&csv_path)?;
    writeln!(
        file,
        "age,sex,cp,trestbps,chol,fbs,restecg,thalach,exang,oldpeak,slope,ca,thal,target"
    )?;
    for i in 0..20u32 {
        // 高風險列為 1，低風險列為 0
        if i % 2 == 0 {
            writeln!(file, "{},1,3,{},{},1,1,{},1,3.{},0,3,2,1", 60 + i / 2, 160 + i, 300 + i, 100 + i, i % 10)?;
        } else {
            writeln!(file, "{},0,0,{},{},0,0,{},0,0.{},2,0,0,0", 35 + i / 2, 110 + i, 180 + i, 175 + i, i % 10)?;
        }
    }
    drop(file);

    let mut config = test_config(&temp_dir, "http://127.0.0.1:9/chat/completions".to_string());
    config.models.training_data.heart = Some(csv_path.to_string_lossy().into_owned());
    assert!(matches!(
        config.training_source(AssessmentKind::Heart),
        TrainingSource::Csv { .. }
    ));

    let copilot = copilot(config, None)?;
    let model = copilot.train(AssessmentKind::Heart).await?;
    assert_eq!(model.samples, 20);
    assert_eq!(model.classifier.name(), "logistic regression");
    assert!(model.training_accuracy > 0.9);

    let sick = HeartInput {
        age: 66,
        sex: 1,
        chest_pain: 3,
        resting_bp: 170,
        cholesterol: 310,
        fasting_blood_sugar: 1,
        resting_ecg: 1,
        max_heart_rate: 105,
        exercise_angina: 1,
        st_depression: 3.5,
        slope: 0,
        major_vessels: 3,
        thal: 2,
    };
    let report = copilot.assess_heart(&sick).await?;
    assert!(report.positive);
    assert_eq!(report.diagnosis, "The person is having heart disease");
    Ok(())
}
