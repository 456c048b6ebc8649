//! Structured logging field name constants.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Fatal configuration problems |
//! | WARN  | Recoverable per-item failure, fallback applied |
//! | INFO  | Lifecycle events, batch summaries |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration, high-volume data |

/// Component within a subsystem.
/// Examples: "indexer", "gemini", "memory_store", "orchestrator"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "parse", "upsert", "query", "generate", "process_document"
pub const OPERATION: &str = "op";

/// Path of the document being processed.
pub const DOC_PATH: &str = "doc_path";

/// Ontology class name being indexed.
pub const CLASS_NAME: &str = "class_name";

/// Model name used for an inference call.
pub const MODEL: &str = "model";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt or response.
pub const PROMPT_LEN: &str = "prompt_len";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
