//! Provider registry: resolves a run configuration to concrete backends.
//!
//! The registry is the single place that knows which backend type
//! corresponds to which provider kind. Call sites work with the
//! `GenerationBackend`/`EmbeddingBackend` traits and never branch on
//! provider identity.

use std::sync::Arc;

use tracing::info;

use premark_core::{
    EmbedProvider, EmbeddingBackend, GenProvider, GenerationBackend, Result, RunConfig,
};

use crate::claude::{ClaudeBackend, ClaudeConfig};
use crate::gemini::{GeminiBackend, GeminiConfig, GoogleEmbeddingBackend, GoogleEmbeddingConfig};
use crate::local::LocalEmbeddingBackend;
use crate::openai::{OpenAiBackend, OpenAiConfig};

/// Backends resolved for one run.
pub struct ResolvedProviders {
    pub generation: Arc<dyn GenerationBackend>,
    pub embedding: Arc<dyn EmbeddingBackend>,
    pub embed_provider: EmbedProvider,
}

/// Resolves and normalizes access to generation and embedding providers.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Build the generation and embedding backends selected by `config`.
    ///
    /// The embedding provider was already decided at configuration time
    /// (explicit override, else the generation provider's default
    /// pairing); this only instantiates clients. Construction failures
    /// are fatal and surface before any document is processed.
    pub fn resolve(config: &RunConfig) -> Result<ResolvedProviders> {
        let generation: Arc<dyn GenerationBackend> = match config.gen_provider {
            GenProvider::Gemini => Arc::new(GeminiBackend::new(GeminiConfig::new(
                config.gen_api_key.clone(),
                config.gen_model.clone(),
            ))?),
            GenProvider::OpenAi => Arc::new(OpenAiBackend::new(
                OpenAiConfig::new(config.gen_api_key.clone())
                    .with_gen_model(config.gen_model.clone()),
            )?),
            GenProvider::Claude => Arc::new(ClaudeBackend::new(ClaudeConfig::new(
                config.gen_api_key.clone(),
                config.gen_model.clone(),
            ))?),
        };

        let embedding: Arc<dyn EmbeddingBackend> = match config.embed_provider {
            EmbedProvider::Google => Arc::new(GoogleEmbeddingBackend::new(
                GoogleEmbeddingConfig::new(config.embed_api_key.clone(), config.embed_model.clone()),
            )?),
            EmbedProvider::OpenAi => Arc::new(OpenAiBackend::new(
                OpenAiConfig::new(config.embed_api_key.clone())
                    .with_embed_model(config.embed_model.clone()),
            )?),
            EmbedProvider::Local => Arc::new(LocalEmbeddingBackend::default()),
        };

        info!(
            gen_provider = %config.gen_provider,
            gen_model = %config.gen_model,
            embed_provider = %config.embed_provider,
            embed_model = %config.embed_model,
            "Resolved inference providers"
        );

        Ok(ResolvedProviders {
            generation,
            embedding,
            embed_provider: config.embed_provider,
        })
    }
}
