//! Google Gemini generation and embedding backends.
//!
//! Generation uses `models/{model}:generateContent`; embeddings use
//! `models/{model}:embedContent` with a retrieval task type, so queries
//! and documents are encoded asymmetrically.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use premark_core::{
    defaults, EmbedRole, EmbeddingBackend, Error, GenerationBackend, Result,
};

/// Default embedding dimension for `models/embedding-001`.
pub const DEFAULT_GOOGLE_EMBED_DIMENSION: usize = 768;

/// Configuration for the Gemini generation backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

/// Gemini text generation backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            base_url = %config.base_url,
            "Initializing Gemini generation backend"
        );
        Ok(Self { client, config })
    }
}

/// Build a `models/{model}:{verb}` URL, tolerating models that already
/// carry the `models/` prefix.
fn model_url(base_url: &str, model: &str, verb: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if model.starts_with("models/") {
        format!("{}/{}:{}", base, model, verb)
    } else {
        format!("{}/models/{}:{}", base, model, verb)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = model_url(&self.config.base_url, &self.config.model, "generateContent");
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "text/plain".to_string(),
            },
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Gemini generate");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Inference("Gemini returned no output".to_string()));
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

/// Configuration for the Google embedding backend.
#[derive(Debug, Clone)]
pub struct GoogleEmbeddingConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

impl GoogleEmbeddingConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimension: DEFAULT_GOOGLE_EMBED_DIMENSION,
            timeout_seconds: defaults::EMBED_TIMEOUT_SECS,
        }
    }
}

/// Google Generative Language embedding backend (asymmetric encoder).
pub struct GoogleEmbeddingBackend {
    client: Client,
    config: GoogleEmbeddingConfig,
}

impl GoogleEmbeddingBackend {
    pub fn new(config: GoogleEmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            dimension = config.dimension,
            "Initializing Google embedding backend"
        );
        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
    #[serde(rename = "taskType")]
    task_type: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

fn task_type(role: EmbedRole) -> &'static str {
    match role {
        EmbedRole::Query => "RETRIEVAL_QUERY",
        EmbedRole::Document => "RETRIEVAL_DOCUMENT",
    }
}

#[async_trait]
impl EmbeddingBackend for GoogleEmbeddingBackend {
    async fn embed(&self, text: &str, role: EmbedRole) -> Result<Vec<f32>> {
        let url = model_url(&self.config.base_url, &self.config.model, "embedContent");
        let request = EmbedContentRequest {
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
            task_type: task_type(role).to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Google embedding API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbedContentResponse = response.json().await?;
        Ok(parsed.embedding.values)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
