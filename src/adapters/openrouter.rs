use crate::config::toml_config::ApiConfig;
use crate::domain::ports::ChatProvider;
use crate::utils::error::{CopilotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat-completion endpoint (OpenRouter by default).
/// One POST per prompt, bounded by the configured timeout, never retried.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    settings: ApiConfig,
    api_key: Option<String>,
}

impl OpenRouterClient {
    pub fn new(settings: ApiConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            settings,
            api_key,
        })
    }

    /// `<base>/models`, derived from the chat endpoint.
    pub fn models_url(&self) -> String {
        let endpoint = self.settings.endpoint.trim_end_matches('/');
        let base = endpoint
            .strip_suffix("/chat/completions")
            .unwrap_or(endpoint);
        format!("{}/models", base)
    }

    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::new("system", &self.settings.system_prompt),
                ChatMessage::new("user", prompt),
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Reachability check used by the setup doctor. No key required.
    pub async fn ping(&self) -> Result<()> {
        let url = self.models_url();
        tracing::debug!("Pinging {}", url);

        let response = self.client.get(&url).timeout(PING_TIMEOUT).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CopilotError::ApiStatusError {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(CopilotError::MissingApiKey)?;

        tracing::debug!(
            "Sending {} char prompt to {} ({})",
            prompt.len(),
            self.settings.endpoint,
            self.settings.model
        );

        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .header("X-Title", &self.settings.title)
            .json(&self.build_request(prompt));
        if let Some(referer) = &self.settings.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status != reqwest::StatusCode::OK {
            return Err(CopilotError::ApiStatusError {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CopilotError::ResponseFormatError {
                message: "response has no choices[0].message.content".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> OpenRouterClient {
        let settings = ApiConfig {
            endpoint: endpoint.to_string(),
            ..ApiConfig::default()
        };
        OpenRouterClient::new(settings, Some("sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_models_url() {
        assert_eq!(
            client("https://openrouter.ai/api/v1/chat/completions").models_url(),
            "https://openrouter.ai/api/v1/models"
        );
        assert_eq!(
            client("http://localhost:9000/v1/").models_url(),
            "http://localhost:9000/v1/models"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = client("https://openrouter.ai/api/v1/chat/completions")
            .build_request("How is my blood pressure?");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "qwen/qwq-32b-preview");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "How is my blood pressure?");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_sending() {
        let provider =
            OpenRouterClient::new(ApiConfig::default(), None).unwrap();
        assert!(!provider.is_configured());
        assert!(matches!(
            provider.complete("hello").await,
            Err(CopilotError::MissingApiKey)
        ));
    }
}
