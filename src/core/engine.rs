use crate::config::toml_config::CopilotConfig;
use crate::core::classifier::TrainedModel;
use crate::core::model_store::ModelStore;
use crate::core::prompts;
use crate::core::scoring::{diabetes_score, heart_score, lifestyle_score, ScoreResult};
use crate::core::{ChatProvider, Storage};
use crate::domain::model::{
    AssessmentKind, ClinicalInput, DiabetesInput, HeartInput, ParkinsonsInput,
};
use crate::domain::profile::{HealthProfile, LifestyleInput};
use crate::utils::error::{CopilotError, Result};
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub kind: AssessmentKind,
    pub diagnosis: String,
    pub positive: bool,
    pub decision: f64,
    /// Heuristic score; Parkinson's has no rule table.
    pub score: Option<ScoreResult>,
    pub explanation: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifestyleReport {
    pub score: ScoreResult,
    pub explanation: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPlan {
    pub dietary: String,
    pub fitness: String,
    pub tips: String,
    pub generated_at: DateTime<Utc>,
}

/// Fixed text shown in place of an explanation when the API call fails.
pub fn fallback_message(err: &CopilotError) -> String {
    match err {
        CopilotError::MissingApiKey => {
            "❌ Error: OpenRouter API key not found in secrets.".to_string()
        }
        CopilotError::ApiStatusError { status } => {
            format!("❌ Error: API request failed with status {}", status)
        }
        other => format!("❌ Error: {}", other),
    }
}

/// Never fails: any provider error becomes the fallback text.
pub async fn explain<P: ChatProvider + ?Sized>(provider: &P, prompt: &str) -> String {
    match provider.complete(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "Explanation unavailable: {} (Category: {:?})",
                e,
                e.category()
            );
            fallback_message(&e)
        }
    }
}

pub struct Copilot<P: ChatProvider, S: Storage> {
    provider: P,
    models: ModelStore<S>,
    config: CopilotConfig,
    explain: bool,
}

impl<P: ChatProvider, S: Storage> Copilot<P, S> {
    pub fn new(provider: P, models: ModelStore<S>, config: CopilotConfig) -> Self {
        let explain = config.output.explain;
        Self {
            provider,
            models,
            config,
            explain,
        }
    }

    pub fn with_explanations(mut self, enabled: bool) -> Self {
        self.explain = enabled;
        self
    }

    fn should_explain(&self) -> bool {
        if !self.explain {
            return false;
        }
        if !self.provider.is_configured() {
            tracing::info!("No API key configured, skipping AI explanation");
            return false;
        }
        true
    }

    pub async fn assess_diabetes(&self, input: &DiabetesInput) -> Result<AssessmentReport> {
        input.validate()?;
        let score = diabetes_score(input);
        self.assess(input, Some(score)).await
    }

    pub async fn assess_heart(&self, input: &HeartInput) -> Result<AssessmentReport> {
        input.validate()?;
        let score = heart_score(input);
        self.assess(input, Some(score)).await
    }

    pub async fn assess_parkinsons(&self, input: &ParkinsonsInput) -> Result<AssessmentReport> {
        input.validate()?;
        self.assess(input, None).await
    }

    async fn assess<I: ClinicalInput + Sync>(
        &self,
        input: &I,
        score: Option<ScoreResult>,
    ) -> Result<AssessmentReport> {
        let kind = input.kind();
        let model = self
            .models
            .load_or_train(kind, &self.config.training_source(kind))
            .await?;
        let prediction = model.predict(&input.features())?;
        let diagnosis = kind.diagnosis(prediction.positive);

        tracing::info!(
            "{} assessment: {} (decision {:.3})",
            kind,
            diagnosis,
            prediction.decision
        );

        let explanation = if self.should_explain() {
            let prompt = prompts::clinical_prompt(input, diagnosis, score.as_ref());
            Some(explain(&self.provider, &prompt).await)
        } else {
            None
        };

        Ok(AssessmentReport {
            kind,
            diagnosis: diagnosis.to_string(),
            positive: prediction.positive,
            decision: prediction.decision,
            score,
            explanation,
            assessed_at: Utc::now(),
        })
    }

    pub async fn assess_lifestyle(&self, input: &LifestyleInput) -> Result<LifestyleReport> {
        input.validate()?;
        let score = lifestyle_score(input);
        tracing::info!(
            "Lifestyle score {}/{} ({})",
            score.score,
            score.max,
            score.level
        );

        let explanation = if self.should_explain() {
            Some(explain(&self.provider, &prompts::lifestyle_prompt(input, &score)).await)
        } else {
            None
        };

        Ok(LifestyleReport {
            score,
            explanation,
            assessed_at: Utc::now(),
        })
    }

    /// Three independent calls; each one falls back on its own.
    pub async fn health_plan(&self, profile: &HealthProfile) -> Result<HealthPlan> {
        profile.validate()?;
        if !self.provider.is_configured() {
            return Err(CopilotError::MissingApiKey);
        }

        tracing::info!("Creating personalized plan");
        let dietary = explain(&self.provider, &prompts::dietary_prompt(profile)).await;
        let fitness = explain(&self.provider, &prompts::fitness_prompt(profile)).await;
        let tips = explain(&self.provider, &prompts::health_tips_prompt(profile)).await;

        Ok(HealthPlan {
            dietary,
            fitness,
            tips,
            generated_at: Utc::now(),
        })
    }

    pub async fn train(&self, kind: AssessmentKind) -> Result<TrainedModel> {
        self.models
            .train(kind, &self.config.training_source(kind))
            .await
    }
}
