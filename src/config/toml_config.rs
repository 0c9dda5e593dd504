use crate::core::dataset::TrainingSource;
use crate::domain::model::AssessmentKind;
use crate::utils::error::{CopilotError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "copilot.toml";
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen/qwq-32b-preview";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful medical AI assistant. Provide informative and helpful health-related responses while being clear that you are not a replacement for professional medical advice.";

/// Key values shipped in example files; treated as "no key".
pub const PLACEHOLDER_KEYS: [&str; 2] = ["your-actual-api-key-here", "your_api_key_here"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopilotConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f64,
    pub referer: Option<String>,
    pub title: String,
    pub system_prompt: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 30,
            max_tokens: 1000,
            temperature: 0.7,
            referer: None,
            title: "AI Health Copilot".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingDataConfig {
    pub diabetes: Option<String>,
    pub heart: Option<String>,
    pub parkinsons: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: String,
    pub seed: u64,
    pub samples: usize,
    pub training_data: TrainingDataConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: "saved_models".to_string(),
            seed: 42,
            samples: 500,
            training_data: TrainingDataConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Ask the hosted model for an explanation after each assessment.
    pub explain: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { explain: true }
    }
}

impl CopilotConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CopilotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CopilotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path must exist; otherwise `copilot.toml` is used when present,
    /// and built-in defaults when it is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// 替換環境變數 (例如 ${OPENROUTER_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CopilotError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Key from the file, falling back to `OPENROUTER_API_KEY`. Blank values,
    /// unresolved `${VAR}` references and example placeholders count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api
            .api_key
            .clone()
            .filter(|key| is_usable_key(key))
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| is_usable_key(key)))
    }

    pub fn training_source(&self, kind: AssessmentKind) -> TrainingSource {
        let csv = match kind {
            AssessmentKind::Diabetes => &self.models.training_data.diabetes,
            AssessmentKind::Heart => &self.models.training_data.heart,
            AssessmentKind::Parkinsons => &self.models.training_data.parkinsons,
        };

        match csv {
            Some(path) => TrainingSource::Csv { path: path.clone() },
            None => TrainingSource::Synthetic {
                samples: self.models.samples,
                seed: self.models.seed,
            },
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.endpoint", &self.api.endpoint)?;
        validation::validate_non_empty_string("api.model", &self.api.model)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validation::validate_range("api.max_tokens", self.api.max_tokens, 1, 32_000)?;
        validation::validate_range("api.temperature", self.api.temperature, 0.0, 2.0)?;
        validation::validate_path("models.dir", &self.models.dir)?;
        validation::validate_positive_number("models.samples", self.models.samples, 10)?;

        let data = &self.models.training_data;
        for (field, path) in [
            ("models.training_data.diabetes", &data.diabetes),
            ("models.training_data.heart", &data.heart),
            ("models.training_data.parkinsons", &data.parkinsons),
        ] {
            if let Some(path) = path {
                validation::validate_path(field, path)?;
            }
        }

        Ok(())
    }
}

pub fn is_placeholder_key(key: &str) -> bool {
    PLACEHOLDER_KEYS.contains(&key.trim())
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !key.starts_with("${") && !is_placeholder_key(key)
}

impl Validate for CopilotConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
