//! # premark-core
//!
//! Core types, traits, and abstractions for the premark library.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other premark crates depend on: the error
//! taxonomy, the immutable run configuration, the shared data model,
//! and the seams (backends, store, external collaborators).

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{EmbedProvider, GenProvider, ProductInfo, RunConfig};
pub use error::{Error, Result};
pub use models::{
    DocumentRecord, DocumentStatus, Frontmatter, IndexRecord, OntologyClass, RunSummary,
    ScoredHit, UpdateOutcome,
};
pub use traits::{
    DocumentSource, DocumentUpdater, EmbedRole, EmbeddingBackend, GenerationBackend, VectorStore,
};
