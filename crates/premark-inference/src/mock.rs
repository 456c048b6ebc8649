//! Mock inference backend for deterministic testing.
//!
//! Embeddings reuse the token-hash encoder from [`crate::local`] at a
//! smaller dimension, so texts sharing vocabulary score higher cosine
//! similarity than unrelated texts. Generation replays configured
//! responses. Every call is logged so tests can assert call counts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use premark_core::{EmbedRole, EmbeddingBackend, Error, GenerationBackend, Result};

use crate::local::token_hash_embed;

/// Default dimension for mock embeddings.
pub const MOCK_DIMENSION: usize = 64;

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    default_response: String,
    /// Substring of the prompt → response.
    response_mappings: Vec<(String, String)>,
    fail_embeddings: bool,
    fail_generation: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: MOCK_DIMENSION,
            default_response: "title: Mock\n".to_string(),
            response_mappings: Vec::new(),
            fail_embeddings: false,
            fail_generation: false,
        }
    }
}

/// One logged backend call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

/// Mock backend implementing both embedding and generation.
#[derive(Clone, Default)]
pub struct MockBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set the response returned for any unmatched prompt.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Return `response` for prompts containing `needle`.
    pub fn with_response_for(
        mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .response_mappings
            .push((needle.into(), response.into()));
        self
    }

    /// Make every embed call fail.
    pub fn with_failing_embeddings(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_embeddings = true;
        self
    }

    /// Make every generate call fail.
    pub fn with_failing_generation(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_generation = true;
        self
    }

    /// All logged calls, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of embed calls so far.
    pub fn embed_call_count(&self) -> usize {
        self.count_op("embed")
    }

    /// Number of generate calls so far.
    pub fn generate_call_count(&self) -> usize {
        self.count_op("generate")
    }

    fn count_op(&self, op: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == op)
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
    }
}

#[async_trait]
impl EmbeddingBackend for MockBackend {
    async fn embed(&self, text: &str, _role: EmbedRole) -> Result<Vec<f32>> {
        self.log_call("embed", text);
        if self.config.fail_embeddings {
            return Err(Error::Embedding("mock embedding failure".to_string()));
        }
        Ok(token_hash_embed(text, self.config.dimension))
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.log_call("generate", prompt);
        if self.config.fail_generation {
            return Err(Error::Inference("mock generation failure".to_string()));
        }
        for (needle, response) in &self.config.response_mappings {
            if prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}
