//! Credential-free local embedding backend.
//!
//! A deterministic bag-of-words encoder: each token is hashed into a
//! fixed-dimension bucket, so texts sharing vocabulary land near each
//! other under cosine similarity. No network and no API key, suited to
//! offline runs where the hosted encoders are unavailable; retrieval
//! quality is lexical overlap only.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use tracing::info;

use premark_core::{defaults, EmbedRole, EmbeddingBackend, Result};

/// Default dimension for local embeddings.
pub const DEFAULT_LOCAL_EMBED_DIMENSION: usize = 256;

/// Deterministic token-hash embedding.
pub(crate) fn token_hash_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimension];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % dimension;
        vector[bucket] += 1.0;
    }
    vector
}

/// Local token-hash embedding backend (symmetric encoder).
pub struct LocalEmbeddingBackend {
    dimension: usize,
    model: String,
}

impl LocalEmbeddingBackend {
    pub fn new(dimension: usize) -> Self {
        info!(dimension = dimension, "Initializing local embedding backend");
        Self {
            dimension,
            model: defaults::LOCAL_EMBED_MODEL.to_string(),
        }
    }
}

impl Default for LocalEmbeddingBackend {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_EMBED_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingBackend for LocalEmbeddingBackend {
    async fn embed(&self, text: &str, _role: EmbedRole) -> Result<Vec<f32>> {
        Ok(token_hash_embed(text, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
