//! Setup validation: run before first use to see what is missing.

use crate::adapters::openrouter::OpenRouterClient;
use crate::config::toml_config::{is_placeholder_key, CopilotConfig, DEFAULT_CONFIG_FILE};
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub results: Vec<CheckResult>,
    pub passed: usize,
    pub total: usize,
    pub checked_at: DateTime<Utc>,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Human-readable checklist shared by `health-copilot doctor` and `copilot-doctor`.
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = format!("🏥 AI Health Copilot - Setup Validation\n{}\n", rule);
        for result in &self.results {
            let mark = if result.passed { "✅" } else { "❌" };
            out.push_str(&format!("{} {}: {}\n", mark, result.name, result.message));
        }
        out.push_str(&format!(
            "{}\n📊 Health Check Results: {}/{} passed\n",
            rule, self.passed, self.total
        ));
        if self.all_passed() {
            out.push_str("🎉 All checks passed! Run: health-copilot diabetes --help\n");
        } else {
            out.push_str("⚠️  Some checks failed. Please fix the issues above.\n");
        }
        out
    }
}

/// Loads the configuration itself so a broken file is reported, not fatal.
pub async fn run_checks(config_path: Option<&str>) -> DoctorReport {
    let mut results = Vec::new();

    let (config, config_check) = check_config(config_path);
    results.push(config_check);
    results.push(check_api_key(&config));
    results.push(check_models_dir(&config));
    results.extend(check_training_data(&config));
    results.push(check_api_connection(&config).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();
    DoctorReport {
        results,
        passed,
        total,
        checked_at: Utc::now(),
    }
}

fn check_config(config_path: Option<&str>) -> (CopilotConfig, CheckResult) {
    const NAME: &str = "Configuration";

    let path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);
    if config_path.is_none() && !Path::new(path).exists() {
        return (
            CopilotConfig::default(),
            CheckResult::pass(NAME, format!("{} not found, using defaults (optional)", path)),
        );
    }

    match CopilotConfig::from_file(path) {
        Ok(config) => match config.validate() {
            Ok(()) => (config, CheckResult::pass(NAME, format!("{} is valid", path))),
            Err(e) => (CopilotConfig::default(), CheckResult::fail(NAME, e.to_string())),
        },
        Err(e) => (
            CopilotConfig::default(),
            CheckResult::fail(NAME, format!("cannot read {}: {}", path, e)),
        ),
    }
}

fn check_api_key(config: &CopilotConfig) -> CheckResult {
    const NAME: &str = "API key";

    if let Some(key) = &config.api.api_key {
        if is_placeholder_key(key) {
            return CheckResult::fail(
                NAME,
                "config contains the example API key; replace it with your OpenRouter key",
            );
        }
    }

    match config.resolve_api_key() {
        Some(_) => CheckResult::pass(NAME, "OpenRouter API key configured"),
        None => CheckResult::fail(
            NAME,
            "OPENROUTER_API_KEY not set and no api_key under [api]",
        ),
    }
}

fn check_models_dir(config: &CopilotConfig) -> CheckResult {
    const NAME: &str = "Model directory";

    let dir = Path::new(&config.models.dir);
    if dir.is_dir() {
        return CheckResult::pass(NAME, format!("{} exists", dir.display()));
    }

    match std::fs::create_dir_all(dir) {
        Ok(()) => CheckResult::pass(NAME, format!("created {}", dir.display())),
        Err(e) => CheckResult::fail(NAME, format!("cannot create {}: {}", dir.display(), e)),
    }
}

fn check_training_data(config: &CopilotConfig) -> Vec<CheckResult> {
    let data = &config.models.training_data;
    [
        ("diabetes", &data.diabetes),
        ("heart", &data.heart),
        ("parkinsons", &data.parkinsons),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.as_ref().map(|p| (kind, p)))
    .map(|(kind, path)| {
        let name = format!("Training data ({})", kind);
        if Path::new(path).is_file() {
            CheckResult::pass(&name, format!("{} found", path))
        } else {
            CheckResult::fail(&name, format!("{} is missing", path))
        }
    })
    .collect()
}

async fn check_api_connection(config: &CopilotConfig) -> CheckResult {
    const NAME: &str = "API connection";

    let client = match OpenRouterClient::new(config.api.clone(), None) {
        Ok(client) => client,
        Err(e) => return CheckResult::fail(NAME, e.to_string()),
    };

    match client.ping().await {
        Ok(()) => CheckResult::pass(NAME, format!("{} reachable", client.models_url())),
        Err(e) => CheckResult::fail(NAME, format!("{}: {}", client.models_url(), e)),
    }
}
