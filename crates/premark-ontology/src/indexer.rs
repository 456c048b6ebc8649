//! Indexing: composed class descriptions into the vector store.
//!
//! Each class becomes one record keyed by its name, so re-indexing the
//! same ontology overwrites in place rather than duplicating. A failure
//! on one class never aborts the pass; it is logged and counted.

use std::collections::BTreeMap;

use tracing::{info, warn};

use premark_core::{IndexRecord, OntologyClass, Result, VectorStore};

/// Outcome counters for one indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: u64,
    pub failed: u64,
}

/// Render the text that gets embedded for a class.
///
/// The same composition feeds retrieval at query time, so the format
/// is part of the index contract: changing it requires re-indexing.
pub fn compose_index_text(class: &OntologyClass) -> String {
    let properties: Vec<&str> = class.properties.keys().map(String::as_str).collect();
    format!(
        "Schema: {}. Description: {}. Properties: {}.",
        class.name,
        class.description,
        properties.join(", ")
    )
}

/// Upsert every class into `store`, continuing past per-class failures.
pub async fn index_classes(
    classes: &BTreeMap<String, OntologyClass>,
    store: &dyn VectorStore,
) -> Result<IndexReport> {
    let mut report = IndexReport::default();

    for class in classes.values() {
        let record = IndexRecord {
            id: class.name.clone(),
            text: compose_index_text(class),
            metadata: serde_json::json!({ "schema_name": class.name }),
        };
        match store.upsert(&record.id, &record.text, record.metadata).await {
            Ok(()) => report.indexed += 1,
            Err(error) => {
                warn!(
                    class_name = %class.name,
                    error = %error,
                    "Failed to index class, continuing"
                );
                report.failed += 1;
            }
        }
    }

    info!(
        indexed = report.indexed,
        failed = report.failed,
        "Ontology indexing complete"
    );
    Ok(report)
}
