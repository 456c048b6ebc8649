//! Shared data model for ontology records, documents, and run accounting.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Generated frontmatter: a mapping of string keys to arbitrary YAML values.
///
/// The structural invariant enforced by validation is that the top-level
/// value is a mapping; anything else is rejected as invalid model output.
pub type Frontmatter = serde_yaml::Mapping;

/// One class extracted from the ontology source.
///
/// Names are namespace-stripped and unique. Names whose first character is
/// lowercase are excluded during parsing (primitive datatypes such as
/// `Text` vs `schema:text` are not true classes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyClass {
    pub name: String,
    pub description: String,
    /// Property name → property description, attached via domain edges.
    pub properties: BTreeMap<String, String>,
}

impl OntologyClass {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// A record as stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Record identity — the class name. Upsert is idempotent on this key.
    pub id: String,
    /// Composed description text that gets embedded.
    pub text: String,
    pub metadata: serde_json::Value,
}

/// A single ranked hit from a vector store query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    pub id: String,
    pub text: String,
    /// Cosine similarity to the query, in descending order per result set.
    pub score: f32,
}

/// One input document, loaded once per processing pass.
///
/// The core never persists these; mutation is delegated to the external
/// updater collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub path: PathBuf,
    pub content: String,
}

impl DocumentRecord {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Result of delegating a frontmatter write to the external updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The header was written.
    Updated,
    /// The file already had frontmatter and `force` was not set.
    SkippedExisting,
}

/// Terminal state of one document's trip through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Empty or whitespace-only content; no retrieval, no generation.
    SkippedEmpty,
    /// Generation failed, output was invalid, or an unexpected error was
    /// caught at the document boundary.
    Failed,
    /// Valid output produced but not written (dry-run mode).
    DryRun,
    /// Frontmatter written.
    Updated,
    /// Updater declined: existing frontmatter, force not set.
    SkippedExisting,
}

/// Counters accumulated across a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub processed: u64,
    pub updated: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl RunSummary {
    /// Fold one document's terminal status into the counters.
    pub fn record(&mut self, status: DocumentStatus) {
        self.processed += 1;
        match status {
            DocumentStatus::Updated => self.updated += 1,
            DocumentStatus::SkippedEmpty | DocumentStatus::SkippedExisting => self.skipped += 1,
            DocumentStatus::Failed => self.failed += 1,
            DocumentStatus::DryRun => {}
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed={} updated={} skipped={} failed={}",
            self.processed, self.updated, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updated() {
        let mut summary = RunSummary::default();
        summary.record(DocumentStatus::Updated);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_record_skip_variants_both_count_as_skipped() {
        let mut summary = RunSummary::default();
        summary.record(DocumentStatus::SkippedEmpty);
        summary.record(DocumentStatus::SkippedExisting);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_record_dry_run_counts_processed_only() {
        let mut summary = RunSummary::default();
        summary.record(DocumentStatus::DryRun);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            processed: 4,
            updated: 2,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            summary.to_string(),
            "processed=4 updated=2 skipped=1 failed=1"
        );
    }

    #[test]
    fn test_ontology_class_new() {
        let class = OntologyClass::new("Article", "A piece of writing.");
        assert_eq!(class.name, "Article");
        assert!(class.properties.is_empty());
    }

    #[test]
    fn test_update_outcome_serialization() {
        let json = serde_json::to_string(&UpdateOutcome::SkippedExisting).unwrap();
        assert_eq!(json, "\"skipped_existing\"");
    }
}
