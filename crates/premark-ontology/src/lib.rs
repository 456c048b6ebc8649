//! # premark-ontology
//!
//! Ontology ingestion for premark: parse a JSON-LD or RDF/XML schema
//! vocabulary into classes, compose per-class description texts, and
//! index them into a vector store for retrieval.

pub mod indexer;
pub mod parser;

pub use indexer::{compose_index_text, index_classes, IndexReport};
pub use parser::{parse_ontology, OntologyFormat};
