//! Default model names, endpoints, and tuning constants.
//!
//! Centralized so backends, the registry, and tests agree on one set of
//! values. Environment variables override these at configuration time.

/// Default Gemini generation model.
pub const GEMINI_GEN_MODEL: &str = "gemini-2.5-pro";

/// Default OpenAI generation model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Default Claude generation model.
pub const CLAUDE_GEN_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Default Google embedding model.
pub const GOOGLE_EMBED_MODEL: &str = "models/embedding-001";

/// Default OpenAI embedding model.
pub const OPENAI_EMBED_MODEL: &str = "text-embedding-3-large";

/// Tag reported by the credential-free local token-hash encoder.
pub const LOCAL_EMBED_MODEL: &str = "token-hash-256";

/// Google Generative Language API endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// OpenAI API endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Anthropic API endpoint.
pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value.
pub const CLAUDE_API_VERSION: &str = "2023-06-01";

/// Token cap for Claude generation requests.
pub const CLAUDE_MAX_TOKENS: u32 = 1024;

/// Sampling temperature for OpenAI generation.
pub const OPENAI_TEMPERATURE: f32 = 0.1;

/// Number of schema records retrieved per document.
pub const TOP_K: usize = 3;

/// Request timeout for generation calls (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 300;

/// Request timeout for embedding calls (seconds).
pub const EMBED_TIMEOUT_SECS: u64 = 60;

/// Retrieval sentinel: the document had no content to query with.
pub const NO_CONTENT_SENTINEL: &str = "No content to analyze.";

/// Retrieval sentinel: the store returned no matching schema.
pub const NO_MATCH_SENTINEL: &str = "No relevant schema found.";

/// Retrieval sentinel: the store lookup itself failed.
pub const RETRIEVAL_ERROR_SENTINEL: &str = "Error while retrieving schema context.";
