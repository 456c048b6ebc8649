//! Anthropic Claude generation backend.
//!
//! Claude offers no embedding endpoint, so this backend is generation
//! only; the registry pairs it with Google embeddings by default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use premark_core::{defaults, Error, GenerationBackend, Result};

/// Configuration for the Claude backend.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl ClaudeConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: defaults::CLAUDE_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: defaults::CLAUDE_MAX_TOKENS,
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

/// Claude text generation backend.
pub struct ClaudeBackend {
    client: Client,
    config: ClaudeConfig,
}

impl ClaudeBackend {
    pub fn new(config: ClaudeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            base_url = %config.base_url,
            "Initializing Claude backend"
        );
        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerationBackend for ClaudeBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1/messages",
            self.config.base_url.trim_end_matches('/')
        );
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Claude generate");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", defaults::CLAUDE_API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Claude API returned {}: {}",
                status, body
            )));
        }

        let parsed: MessagesResponse = response.json().await?;
        // Non-text blocks (tool use, thinking) are skipped.
        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(Error::Inference("Claude returned no output".to_string()));
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
