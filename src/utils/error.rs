use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API request failed with status {status}")]
    ApiStatusError { status: u16 },

    #[error("OpenRouter API key not found in secrets")]
    MissingApiKey,

    #[error("Unexpected API response: {message}")]
    ResponseFormatError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input '{field}' = {value}: {reason}")]
    InputError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Training data error: {message}")]
    TrainingDataError { message: String },

    #[error("Model error: {message}")]
    ModelError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Model,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CopilotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CopilotError::ApiError(_)
            | CopilotError::ApiStatusError { .. }
            | CopilotError::ResponseFormatError { .. } => ErrorCategory::Network,
            CopilotError::MissingApiKey
            | CopilotError::ConfigError { .. }
            | CopilotError::ConfigValidationError { .. }
            | CopilotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CopilotError::InputError { .. } => ErrorCategory::Input,
            CopilotError::CsvError(_)
            | CopilotError::TrainingDataError { .. }
            | CopilotError::ModelError { .. } => ErrorCategory::Model,
            CopilotError::IoError(_) | CopilotError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Model => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CopilotError::ApiError(e) if e.is_timeout() => {
                "The model took too long to answer; try again later".to_string()
            }
            CopilotError::ApiError(_) => "Check your network connection and try again".to_string(),
            CopilotError::ApiStatusError { status: 401 | 403 } => {
                "Check that OPENROUTER_API_KEY is valid".to_string()
            }
            CopilotError::ApiStatusError { .. } | CopilotError::ResponseFormatError { .. } => {
                "The API is unavailable right now; try again later".to_string()
            }
            CopilotError::MissingApiKey => {
                "Set OPENROUTER_API_KEY or add api_key under [api] in copilot.toml".to_string()
            }
            CopilotError::ConfigError { .. }
            | CopilotError::ConfigValidationError { .. }
            | CopilotError::InvalidConfigValueError { .. } => {
                "Review copilot.toml or run copilot-doctor".to_string()
            }
            CopilotError::InputError { .. } => {
                "Re-run with a value inside the allowed range".to_string()
            }
            CopilotError::CsvError(_) | CopilotError::TrainingDataError { .. } => {
                "Check the training CSV header and label column".to_string()
            }
            CopilotError::ModelError { .. } => {
                "Delete the cached model file and run `health-copilot train`".to_string()
            }
            CopilotError::IoError(_) | CopilotError::SerializationError(_) => {
                "Check file permissions for the models directory".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the AI assistant: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Model => format!("Prediction model problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CopilotError>;
