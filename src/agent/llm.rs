//! OpenAI-compatible chat client used by the advisory step.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::AdvisorConfig;
use crate::error::{Result, ScoutError};

/// Chat client configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key, read from the environment
    pub api_key: String,
    /// Chat completions base URL
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Request timeout
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn from_env(advisor: &AdvisorConfig) -> Self {
        Self {
            api_key: std::env::var("ADVISOR_API_KEY").unwrap_or_default(),
            base_url: std::env::var("ADVISOR_API_URL").unwrap_or_else(|_| advisor.base_url.clone()),
            model: std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| advisor.model.clone()),
            timeout_secs: advisor.timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Thin chat-completions client
pub struct LlmClient {
    config: LlmConfig,
    http: Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScoutError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Send a single-turn prompt and return the raw completion text
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        if !self.is_configured() {
            return Err(ScoutError::AdvisorNotConfigured(
                "ADVISOR_API_KEY is not set".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(0.3),
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %self.config.model, "sending advisory prompt");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoutError::Advisor(format!(
                "chat completion failed: status={} body={}",
                status, body
            )));
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ScoutError::Advisor("empty completion response".to_string()))
    }
}
