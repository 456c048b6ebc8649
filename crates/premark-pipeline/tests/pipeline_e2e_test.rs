//! End-to-end pipeline tests over mock collaborators: ontology classes
//! indexed into the in-memory store, deterministic mock inference, and
//! a recording updater standing in for the external file mutator.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use premark_core::defaults::RETRIEVAL_ERROR_SENTINEL;
use premark_core::{
    DocumentRecord, DocumentSource, DocumentUpdater, Error, Frontmatter, OntologyClass,
    ProductInfo, Result, UpdateOutcome, VectorStore,
};
use premark_inference::mock::MockBackend;
use premark_ontology::index_classes;
use premark_pipeline::{run_with_setup, Orchestrator, PromptAssets, RunOptions};
use premark_store::MemoryVectorStore;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingUpdater {
    /// Paths that behave as if they already carry frontmatter.
    existing: HashSet<PathBuf>,
    calls: Mutex<Vec<(PathBuf, Frontmatter, bool)>>,
}

impl RecordingUpdater {
    fn with_existing(path: impl Into<PathBuf>) -> Self {
        Self {
            existing: HashSet::from([path.into()]),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(PathBuf, Frontmatter, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentUpdater for RecordingUpdater {
    async fn apply(
        &self,
        path: &Path,
        frontmatter: &Frontmatter,
        force: bool,
    ) -> Result<UpdateOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), frontmatter.clone(), force));
        if self.existing.contains(path) && !force {
            Ok(UpdateOutcome::SkippedExisting)
        } else {
            Ok(UpdateOutcome::Updated)
        }
    }
}

struct StaticSource(Vec<DocumentRecord>);

#[async_trait]
impl DocumentSource for StaticSource {
    async fn list(&self) -> Result<Vec<DocumentRecord>> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

#[async_trait]
impl DocumentSource for FailingSource {
    async fn list(&self) -> Result<Vec<DocumentRecord>> {
        Err(Error::Config("documents root does not exist".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn sample_classes() -> BTreeMap<String, OntologyClass> {
    let mut article = OntologyClass::new(
        "Article",
        "A piece of writing about news or current events.",
    );
    article.properties.insert(
        "headline".to_string(),
        "Headline of the article.".to_string(),
    );
    let recipe = OntologyClass::new("Recipe", "Cooking instructions for a dish.");

    let mut classes = BTreeMap::new();
    classes.insert(article.name.clone(), article);
    classes.insert(recipe.name.clone(), recipe);
    classes
}

fn assets() -> PromptAssets {
    PromptAssets {
        template: "KB:{{KNOWLEDGE_BASE_CONTENT}}\nSCHEMAS:{{SCHEMA_DEFINITIONS}}\n\
                   DOC:{{MARKDOWN_CONTENT}}\nPRODUCT:{{PRODUCT_NAME}} {{PRODUCT_VERSION}}"
            .to_string(),
        knowledge_base: "House style notes".to_string(),
    }
}

fn product() -> ProductInfo {
    ProductInfo {
        name: "Premark".to_string(),
        version: "1.2".to_string(),
    }
}

async fn indexed_store(embed: &MockBackend) -> Arc<MemoryVectorStore> {
    let store = Arc::new(MemoryVectorStore::new(Arc::new(embed.clone())));
    index_classes(&sample_classes(), store.as_ref()).await.unwrap();
    store
}

fn orchestrator(
    store: Arc<MemoryVectorStore>,
    generation: MockBackend,
    updater: Arc<RecordingUpdater>,
    options: RunOptions,
) -> Orchestrator {
    init_logging();
    Orchestrator::new(
        store,
        Arc::new(generation),
        updater,
        assets(),
        product(),
        options,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_article_document_gets_grounded_frontmatter() {
    let embed = MockBackend::new();
    let store = indexed_store(&embed).await;
    let generation = MockBackend::new().with_response_for(
        "Schema: Article",
        "```yaml\ntitle: Market Update\nheadline: Markets rally\n```",
    );
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        store.clone(),
        generation.clone(),
        updater.clone(),
        RunOptions::default(),
    );

    let hits = store.query("An article about world news", 3).await.unwrap();
    assert!(
        hits.iter().any(|hit| hit.id == "Article"),
        "Article schema must rank in the top 3 for an article query"
    );

    let docs = vec![DocumentRecord::new(
        "docs/markets.md",
        "An article about news from the markets.",
    )];
    let summary = orchestrator.run(&docs).await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    // Retrieval put the Article schema text into the prompt.
    let generate_inputs: Vec<_> = generation
        .calls()
        .into_iter()
        .filter(|c| c.operation == "generate")
        .collect();
    assert_eq!(generate_inputs.len(), 1);
    assert!(generate_inputs[0].input.contains("Schema: Article"));
    assert!(generate_inputs[0].input.contains("PRODUCT:Premark 1.2"));

    let calls = updater.calls();
    assert_eq!(calls.len(), 1);
    let (path, frontmatter, force) = &calls[0];
    assert_eq!(path, Path::new("docs/markets.md"));
    assert!(!force);
    assert!(frontmatter.contains_key("headline"));
}

#[tokio::test]
async fn test_empty_document_short_circuits_all_backends() {
    let embed = MockBackend::new();
    let store = indexed_store(&embed).await;
    let index_embed_calls = embed.embed_call_count();

    let generation = MockBackend::new();
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        store,
        generation.clone(),
        updater.clone(),
        RunOptions::default(),
    );

    let docs = vec![DocumentRecord::new("docs/empty.md", "   \n\t  ")];
    let summary = orchestrator.run(&docs).await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(embed.embed_call_count(), index_embed_calls, "no query embed");
    assert_eq!(generation.generate_call_count(), 0);
    assert!(updater.calls().is_empty());
}

#[tokio::test]
async fn test_force_flag_controls_overwrite() {
    let embed = MockBackend::new();
    let docs = vec![DocumentRecord::new("docs/a.md", "An article about news.")];

    // Without force, an existing header wins.
    let updater = Arc::new(RecordingUpdater::with_existing("docs/a.md"));
    let orchestrator_no_force = orchestrator(
        indexed_store(&embed).await,
        MockBackend::new(),
        updater.clone(),
        RunOptions::default(),
    );
    let summary = orchestrator_no_force.run(&docs).await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.updated, 0);

    // With force, the same document is rewritten.
    let updater = Arc::new(RecordingUpdater::with_existing("docs/a.md"));
    let orchestrator_force = orchestrator(
        indexed_store(&embed).await,
        MockBackend::new(),
        updater.clone(),
        RunOptions {
            force: true,
            ..RunOptions::default()
        },
    );
    let summary = orchestrator_force.run(&docs).await;
    assert_eq!(summary.updated, 1);
    assert!(updater.calls()[0].2, "force flag must reach the updater");
}

#[tokio::test]
async fn test_dry_run_validates_without_writing() {
    let embed = MockBackend::new();
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        indexed_store(&embed).await,
        MockBackend::new(),
        updater.clone(),
        RunOptions {
            dry_run: true,
            ..RunOptions::default()
        },
    );

    let docs = vec![DocumentRecord::new("docs/a.md", "An article about news.")];
    let summary = orchestrator.run(&docs).await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
    assert!(updater.calls().is_empty());
}

#[tokio::test]
async fn test_one_bad_document_never_aborts_the_batch() {
    let embed = MockBackend::new();
    // The middle document trips the invalid-output path; the rest use
    // the default (valid) response.
    let generation = MockBackend::new()
        .with_response_for("DOC:broken markup here", "- not\n- a\n- mapping\n");
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        indexed_store(&embed).await,
        generation,
        updater.clone(),
        RunOptions::default(),
    );

    let docs = vec![
        DocumentRecord::new("docs/a.md", "An article about news."),
        DocumentRecord::new("docs/b.md", "broken markup here"),
        DocumentRecord::new("docs/c.md", "A recipe for cooking a dish."),
    ];
    let summary = orchestrator.run(&docs).await;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(updater.calls().len(), 2);
}

#[tokio::test]
async fn test_generation_failure_is_counted_per_document() {
    let embed = MockBackend::new();
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        indexed_store(&embed).await,
        MockBackend::new().with_failing_generation(),
        updater.clone(),
        RunOptions::default(),
    );

    let docs = vec![DocumentRecord::new("docs/a.md", "An article about news.")];
    let summary = orchestrator.run(&docs).await;

    assert_eq!(summary.failed, 1);
    assert!(updater.calls().is_empty());
}

#[tokio::test]
async fn test_retrieval_failure_degrades_to_sentinel() {
    // Index with a working embedder, snapshot, then reopen with a
    // failing embedder so the query path errors on a non-empty store.
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("store.json");
    let seeded = indexed_store(&MockBackend::new()).await;
    seeded.save(&snapshot).await.unwrap();
    let failing_store = Arc::new(
        MemoryVectorStore::load(
            &snapshot,
            Arc::new(MockBackend::new().with_failing_embeddings()),
        )
        .await
        .unwrap(),
    );
    let generation = MockBackend::new();
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        failing_store,
        generation.clone(),
        updater.clone(),
        RunOptions::default(),
    );

    let docs = vec![DocumentRecord::new("docs/a.md", "An article about news.")];
    let summary = orchestrator.run(&docs).await;

    // Degraded grounding, not failure: generation still ran.
    assert_eq!(summary.updated, 1);
    let generate_inputs: Vec<_> = generation
        .calls()
        .into_iter()
        .filter(|c| c.operation == "generate")
        .collect();
    assert!(generate_inputs[0].input.contains(RETRIEVAL_ERROR_SENTINEL));
}

#[tokio::test]
async fn test_run_to_report_always_carries_a_summary() {
    let embed = MockBackend::new();
    let updater = Arc::new(RecordingUpdater::default());
    let orchestrator = orchestrator(
        indexed_store(&embed).await,
        MockBackend::new(),
        updater,
        RunOptions::default(),
    );

    let report = orchestrator
        .run_to_report(&StaticSource(vec![DocumentRecord::new(
            "docs/a.md",
            "An article about news.",
        )]))
        .await;
    assert!(report.fatal.is_none());
    assert_eq!(report.summary.processed, 1);

    let report = orchestrator.run_to_report(&FailingSource).await;
    assert!(matches!(report.fatal, Some(Error::Config(_))));
    assert_eq!(report.summary.processed, 0);
}

#[tokio::test]
async fn test_setup_failure_yields_report_with_zeroed_summary() {
    init_logging();
    let source = StaticSource(vec![DocumentRecord::new(
        "docs/a.md",
        "An article about news.",
    )]);

    let report = run_with_setup(
        || Err(Error::Config("GEMINI_API_KEY must be set".to_string())),
        &source,
    )
    .await;

    assert!(matches!(report.fatal, Some(Error::Config(_))));
    assert_eq!(report.summary.processed, 0);
    assert_eq!(report.summary.updated, 0);
    assert_eq!(report.summary.failed, 0);
}

#[tokio::test]
async fn test_setup_success_runs_the_batch() {
    let embed = MockBackend::new();
    let store = indexed_store(&embed).await;
    let updater = Arc::new(RecordingUpdater::default());
    let source = StaticSource(vec![DocumentRecord::new(
        "docs/a.md",
        "An article about news.",
    )]);

    let report = run_with_setup(
        || {
            Ok(orchestrator(
                store.clone(),
                MockBackend::new(),
                updater.clone(),
                RunOptions::default(),
            ))
        },
        &source,
    )
    .await;

    assert!(report.fatal.is_none());
    assert_eq!(report.summary.processed, 1);
    assert_eq!(report.summary.updated, 1);
}
