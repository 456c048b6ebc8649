//! Error types for premark.

use thiserror::Error;

/// Result type alias using premark's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for premark operations.
///
/// `Config` errors are fatal and abort a run before any document is
/// processed. Everything else is contained within the failing step
/// (per class during indexing, per document during generation).
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing credential, unsupported provider,
    /// unsupported ontology extension, empty extraction result)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ontology parsing failed
    #[error("Ontology error: {0}")]
    Ontology(String),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Generation/inference failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Vector store lookup failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Generated output failed structural validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error aborts the whole run.
    ///
    /// Only configuration-time errors are fatal; everything else is
    /// recoverable at the per-item boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
