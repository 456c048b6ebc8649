//! # premark-store
//!
//! `VectorStore` implementation for premark: an in-memory cosine index
//! over backend-produced embeddings, with JSON snapshot persistence.

pub mod memory;

pub use memory::{cosine_similarity, MemoryVectorStore};
