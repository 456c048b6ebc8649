//! Per-document pipeline orchestration.
//!
//! One document moves through retrieve → assemble → generate → validate →
//! update, strictly sequentially. Every failure is absorbed at the
//! document boundary: a batch run always completes and always reports a
//! summary, whatever happened to individual documents.

use std::sync::Arc;

use tracing::{error, info, warn};

use premark_core::defaults::{
    NO_CONTENT_SENTINEL, NO_MATCH_SENTINEL, RETRIEVAL_ERROR_SENTINEL, TOP_K,
};
use premark_core::{
    DocumentRecord, DocumentSource, DocumentStatus, DocumentUpdater, Error, GenerationBackend,
    ProductInfo, Result, RunSummary, UpdateOutcome, VectorStore,
};

use crate::prompt::{PromptAssembler, PromptAssets, PromptInputs};
use crate::validate::{parse_frontmatter, Validated};

/// Knobs for one batch run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Validate and report, never write.
    pub dry_run: bool,
    /// Overwrite existing frontmatter.
    pub force: bool,
    /// Number of schema definitions retrieved per document.
    pub top_k: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            top_k: TOP_K,
        }
    }
}

/// Outcome of a whole batch, produced even when setup fails.
#[derive(Debug)]
pub struct BatchReport {
    pub summary: RunSummary,
    /// Set when the run aborted before processing any document.
    pub fatal: Option<Error>,
}

/// Drives documents through the generation pipeline.
pub struct Orchestrator {
    store: Arc<dyn VectorStore>,
    generation: Arc<dyn GenerationBackend>,
    updater: Arc<dyn DocumentUpdater>,
    assembler: PromptAssembler,
    knowledge_base: String,
    product: ProductInfo,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn VectorStore>,
        generation: Arc<dyn GenerationBackend>,
        updater: Arc<dyn DocumentUpdater>,
        assets: PromptAssets,
        product: ProductInfo,
        options: RunOptions,
    ) -> Self {
        Self {
            store,
            generation,
            updater,
            assembler: PromptAssembler::new(assets.template),
            knowledge_base: assets.knowledge_base,
            product,
            options,
        }
    }

    /// Retrieve schema context for a document.
    ///
    /// Never fails: absent or unavailable context degrades to a sentinel
    /// string so generation still runs, just less grounded.
    async fn retrieve_context(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return NO_CONTENT_SENTINEL.to_string();
        }
        match self.store.query(content, self.options.top_k).await {
            Ok(hits) if hits.is_empty() => NO_MATCH_SENTINEL.to_string(),
            Ok(hits) => hits
                .iter()
                .map(|hit| hit.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
            Err(e) => {
                warn!(error = %e, "Schema retrieval failed, continuing without context");
                RETRIEVAL_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Run one document to its terminal status. Never returns an error;
    /// anything that goes wrong lands on `Failed`.
    pub async fn process_document(&self, document: &DocumentRecord) -> DocumentStatus {
        if document.content.trim().is_empty() {
            info!(doc_path = %document.path.display(), "Skipping empty document");
            return DocumentStatus::SkippedEmpty;
        }

        let context = self.retrieve_context(&document.content).await;
        let prompt = self.assembler.assemble(&PromptInputs {
            knowledge_base: &self.knowledge_base,
            schema_definitions: &context,
            markdown_content: &document.content,
            product_name: &self.product.name,
            product_version: &self.product.version,
        });

        let raw = match self.generation.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    doc_path = %document.path.display(),
                    model = self.generation.model_name(),
                    error = %e,
                    "Generation failed"
                );
                return DocumentStatus::Failed;
            }
        };

        let frontmatter = match parse_frontmatter(&raw) {
            Validated::Valid(frontmatter) => frontmatter,
            Validated::Invalid(reason) => {
                warn!(
                    doc_path = %document.path.display(),
                    reason = %reason,
                    "Rejected generated output"
                );
                return DocumentStatus::Failed;
            }
        };

        if self.options.dry_run {
            info!(
                doc_path = %document.path.display(),
                key_count = frontmatter.len(),
                "Dry run: frontmatter validated, not written"
            );
            return DocumentStatus::DryRun;
        }

        match self
            .updater
            .apply(&document.path, &frontmatter, self.options.force)
            .await
        {
            Ok(UpdateOutcome::Updated) => {
                info!(doc_path = %document.path.display(), "Frontmatter written");
                DocumentStatus::Updated
            }
            Ok(UpdateOutcome::SkippedExisting) => {
                info!(
                    doc_path = %document.path.display(),
                    "Existing frontmatter kept (use force to overwrite)"
                );
                DocumentStatus::SkippedExisting
            }
            Err(e) => {
                error!(doc_path = %document.path.display(), error = %e, "Update failed");
                DocumentStatus::Failed
            }
        }
    }

    /// Process every document in order and report the counters.
    pub async fn run(&self, documents: &[DocumentRecord]) -> RunSummary {
        let mut summary = RunSummary::default();
        for document in documents {
            let status = self.process_document(document).await;
            summary.record(status);
        }
        info!(%summary, "Batch run complete");
        summary
    }

    /// Enumerate documents from `source` and run them.
    ///
    /// A listing failure aborts before the first document but still
    /// produces a (zeroed) summary, so callers always have one to print.
    pub async fn run_to_report(&self, source: &dyn DocumentSource) -> BatchReport {
        match source.list().await {
            Ok(documents) => BatchReport {
                summary: self.run(&documents).await,
                fatal: None,
            },
            Err(e) => {
                let summary = RunSummary::default();
                error!(error = %e, "Document enumeration failed, nothing processed");
                info!(%summary, "Batch run complete");
                BatchReport {
                    summary,
                    fatal: Some(e),
                }
            }
        }
    }
}

/// Build an orchestrator via `setup` and run it over `source`.
///
/// Setup failures (configuration, provider resolution, asset loading)
/// are folded into the report the same way listing failures are: the
/// fatal error is recorded next to a zeroed summary, so the caller
/// always has counters to print.
pub async fn run_with_setup<F>(setup: F, source: &dyn DocumentSource) -> BatchReport
where
    F: FnOnce() -> Result<Orchestrator>,
{
    match setup() {
        Ok(orchestrator) => orchestrator.run_to_report(source).await,
        Err(e) => {
            let summary = RunSummary::default();
            error!(error = %e, "Pipeline setup failed, nothing processed");
            info!(%summary, "Batch run complete");
            BatchReport {
                summary,
                fatal: Some(e),
            }
        }
    }
}
