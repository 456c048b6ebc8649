//! # premark-inference
//!
//! Generation and embedding backends for premark, normalized behind the
//! `GenerationBackend`/`EmbeddingBackend` traits from `premark-core`.
//!
//! Three generation providers (Gemini, OpenAI, Claude) and three
//! embedding providers (Google, OpenAI, and a credential-free local
//! encoder) are supported; the [`registry`] module maps a run
//! configuration to concrete backends so call sites never branch on
//! provider identity.

pub mod claude;
pub mod gemini;
pub mod local;
pub mod openai;
pub mod registry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use claude::{ClaudeBackend, ClaudeConfig};
pub use gemini::{GeminiBackend, GeminiConfig, GoogleEmbeddingBackend, GoogleEmbeddingConfig};
pub use local::{LocalEmbeddingBackend, DEFAULT_LOCAL_EMBED_DIMENSION};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use registry::{ProviderRegistry, ResolvedProviders};
