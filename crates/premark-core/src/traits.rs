//! Core traits for premark abstractions.
//!
//! These traits define the seams between the pipeline and its pluggable
//! collaborators: inference backends, the vector store, and the external
//! document enumeration/mutation contracts the core consumes but does not
//! implement.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::{DocumentRecord, Frontmatter, ScoredHit, UpdateOutcome};

/// How a text is being embedded.
///
/// Asymmetric encoders (e.g. Google's retrieval task types) produce
/// different vectors for queries than for stored documents; symmetric
/// encoders ignore the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedRole {
    Query,
    Document,
}

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single text in the given role.
    async fn embed(&self, text: &str, role: EmbedRole) -> Result<Vec<f32>>;

    /// Expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
///
/// Implementations normalize their provider's response shape to plain
/// text; callers never see per-provider payloads. Empty model output is
/// an `Error::Inference`, not an empty string.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model name being used.
    fn model_name(&self) -> &str;
}

/// Pluggable embedding index.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store an embedding of `text` keyed by `id`, overwriting any existing
    /// record with the same id. Idempotent under repeated application.
    async fn upsert(&self, id: &str, text: &str, metadata: JsonValue) -> Result<()>;

    /// Return up to `k` stored texts most similar to `text`, ordered by
    /// descending similarity with a deterministic tie-break.
    ///
    /// An empty store or empty query text yields `Ok(vec![])`; the caller
    /// decides how to represent absent context.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredHit>>;

    /// Number of records currently stored.
    async fn len(&self) -> Result<usize>;
}

/// External collaborator: applies a frontmatter header to a file.
///
/// Contract: write only if the file has no existing frontmatter or
/// `force` is true; otherwise report `SkippedExisting`. The core never
/// touches file contents itself.
#[async_trait]
pub trait DocumentUpdater: Send + Sync {
    async fn apply(
        &self,
        path: &Path,
        frontmatter: &Frontmatter,
        force: bool,
    ) -> Result<UpdateOutcome>;
}

/// External collaborator: enumerates candidate documents under a root.
///
/// Order is unspecified but must be stable within a run.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list(&self) -> Result<Vec<DocumentRecord>>;
}
