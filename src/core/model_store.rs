use crate::core::classifier::TrainedModel;
use crate::core::dataset::{Dataset, TrainingSource};
use crate::core::Storage;
use crate::domain::model::AssessmentKind;
use crate::utils::error::{CopilotError, Result};

/// Caches fitted models as `<kind>_model.json` in a storage backend.
pub struct ModelStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ModelStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn load(&self, kind: AssessmentKind) -> Result<Option<TrainedModel>> {
        let file_name = kind.model_file_name();
        if !self.storage.exists(&file_name).await {
            return Ok(None);
        }

        let bytes = self.storage.read_file(&file_name).await?;
        let model: TrainedModel = serde_json::from_slice(&bytes)?;
        if model.kind != kind {
            return Err(CopilotError::ModelError {
                message: format!("{} holds a {} model", file_name, model.kind.slug()),
            });
        }
        Ok(Some(model))
    }

    pub async fn save(&self, model: &TrainedModel) -> Result<()> {
        let data = serde_json::to_vec_pretty(model)?;
        let file_name = model.kind.model_file_name();
        tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
        self.storage.write_file(&file_name, &data).await
    }

    /// Fits a fresh model and overwrites any cached one.
    pub async fn train(&self, kind: AssessmentKind, source: &TrainingSource) -> Result<TrainedModel> {
        let dataset = Dataset::load(kind, source)?;
        let model = TrainedModel::train(&dataset, source.clone())?;
        self.save(&model).await?;
        Ok(model)
    }

    pub async fn load_or_train(
        &self,
        kind: AssessmentKind,
        source: &TrainingSource,
    ) -> Result<TrainedModel> {
        if let Some(model) = self.load(kind).await? {
            tracing::debug!("Loaded cached {} model", kind.slug());
            if !model.trained_from(source) {
                tracing::warn!(
                    "Cached {} model was trained from {:?}, config now says {:?}; run `health-copilot train {}` to refit",
                    kind.slug(),
                    model.source,
                    source,
                    kind.slug()
                );
            }
            return Ok(model);
        }

        tracing::info!("No cached {} model, training one", kind.slug());
        self.train(kind, source).await
    }
}
