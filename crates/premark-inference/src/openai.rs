//! OpenAI generation and embedding backend.
//!
//! Generation goes through chat completions with a YAML-oriented system
//! message and low temperature; embeddings use the embeddings endpoint.
//! OpenAI's encoder is symmetric, so the embed role is ignored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use premark_core::{
    defaults, EmbedRole, EmbeddingBackend, Error, GenerationBackend, Result,
};

/// Default embedding dimension for `text-embedding-3-large`.
pub const DEFAULT_OPENAI_EMBED_DIMENSION: usize = 3072;

/// System message framing every generation request.
const SYSTEM_PROMPT: &str = "You are an assistant that produces valid YAML frontmatter.";

/// Configuration for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub gen_model: String,
    pub embed_model: String,
    pub embed_dimension: usize,
    pub timeout_seconds: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            gen_model: defaults::OPENAI_GEN_MODEL.to_string(),
            embed_model: defaults::OPENAI_EMBED_MODEL.to_string(),
            embed_dimension: DEFAULT_OPENAI_EMBED_DIMENSION,
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        }
    }

    pub fn with_gen_model(mut self, model: impl Into<String>) -> Self {
        self.gen_model = model.into();
        self
    }

    pub fn with_embed_model(mut self, model: impl Into<String>) -> Self {
        self.embed_model = model.into();
        self
    }
}

/// OpenAI inference backend.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            gen_model = %config.gen_model,
            embed_model = %config.embed_model,
            base_url = %config.base_url,
            "Initializing OpenAI backend"
        );
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: defaults::OPENAI_TEMPERATURE,
        };

        debug!(model = %self.config.gen_model, prompt_len = prompt.len(), "OpenAI generate");
        let response = self
            .client
            .post(self.endpoint("/chat/completions"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenAI API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Inference("OpenAI returned no output".to_string()));
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiBackend {
    async fn embed(&self, text: &str, _role: EmbedRole) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.config.embed_model.clone(),
            input: vec![text.to_string()],
        };

        let response = self
            .client
            .post(self.endpoint("/embeddings"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "OpenAI embeddings API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::Embedding("OpenAI returned no embedding".to_string()))
    }

    fn dimension(&self) -> usize {
        self.config.embed_dimension
    }

    fn model_name(&self) -> &str {
        &self.config.embed_model
    }
}
