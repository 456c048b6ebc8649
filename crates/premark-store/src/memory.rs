//! In-memory vector store backed by an embedding backend.
//!
//! Records are keyed by id; upsert re-embeds and overwrites, making
//! repeated indexing idempotent. Queries rank by cosine similarity with
//! a deterministic tie-break (ascending id), so a fixed store and query
//! always produce the same ordering.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use tracing::{debug, info};

use premark_core::{EmbedRole, EmbeddingBackend, Error, Result, ScoredHit, VectorStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    text: String,
    metadata: JsonValue,
    vector: Vec<f32>,
}

/// Vector store holding embeddings in memory.
///
/// The embedding backend is consulted at upsert time (document role) and
/// query time (query role). Snapshots can be saved to and loaded from a
/// JSON file; loaded records keep their stored vectors, so re-opening a
/// snapshot performs no embedding calls.
pub struct MemoryVectorStore {
    backend: Arc<dyn EmbeddingBackend>,
    records: RwLock<BTreeMap<String, StoredRecord>>,
}

impl MemoryVectorStore {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            backend,
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load a snapshot written by [`MemoryVectorStore::save`].
    pub async fn load(path: &Path, backend: Arc<dyn EmbeddingBackend>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let records: BTreeMap<String, StoredRecord> = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            record_count = records.len(),
            "Loaded vector store snapshot"
        );
        Ok(Self {
            backend,
            records: RwLock::new(records),
        })
    }

    /// Write all records (including vectors) to a JSON snapshot.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let records = self.records.read().await;
        let raw = serde_json::to_string(&*records)?;
        tokio::fs::write(path, raw).await?;
        info!(
            path = %path.display(),
            record_count = records.len(),
            "Saved vector store snapshot"
        );
        Ok(())
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, id: &str, text: &str, metadata: JsonValue) -> Result<()> {
        let vector = self
            .backend
            .embed(text, EmbedRole::Document)
            .await
            .map_err(|e| Error::Embedding(format!("embedding '{}' failed: {}", id, e)))?;

        let mut records = self.records.write().await;
        let replaced = records
            .insert(
                id.to_string(),
                StoredRecord {
                    text: text.to_string(),
                    metadata,
                    vector,
                },
            )
            .is_some();
        debug!(id = id, replaced = replaced, "Upserted vector store record");
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredHit>> {
        if text.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let records = self.records.read().await;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self
            .backend
            .embed(text, EmbedRole::Query)
            .await
            .map_err(|e| Error::Retrieval(format!("query embedding failed: {}", e)))?;

        let mut hits: Vec<ScoredHit> = records
            .iter()
            .map(|(id, record)| ScoredHit {
                id: id.clone(),
                text: record.text.clone(),
                score: cosine_similarity(&query_vec, &record.vector),
            })
            .collect();

        // Descending score; ties broken by ascending id for determinism.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(k);

        debug!(
            result_count = hits.len(),
            k = k,
            "Vector store query completed"
        );
        Ok(hits)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

/// Cosine similarity of two vectors.
///
/// Mismatched dimensions or a zero-norm operand score 0.0 rather than
/// erroring; such records simply rank last.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
