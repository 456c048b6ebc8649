//! Run configuration: provider selection, credentials, and product info.
//!
//! Ambient environment state is read exactly once, at startup, into a
//! [`RunConfig`] that is passed by reference into every component.
//! Configuration-time errors are fatal and surface before any document
//! is processed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults;
use crate::error::{Error, Result};

/// Generation provider kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenProvider {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// OpenAI chat completions
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic Claude messages
    Claude,
}

impl GenProvider {
    /// Documented default embedding pairing for this generation provider.
    ///
    /// Used when no explicit embedding override is configured: OpenAI
    /// pairs with its own embeddings, everything else with Google's.
    pub fn default_embed_provider(self) -> EmbedProvider {
        match self {
            Self::OpenAi => EmbedProvider::OpenAi,
            Self::Gemini | Self::Claude => EmbedProvider::Google,
        }
    }
}

impl std::fmt::Display for GenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
            Self::Claude => write!(f, "claude"),
        }
    }
}

impl std::str::FromStr for GenProvider {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "claude" => Ok(Self::Claude),
            other => Err(format!(
                "Unsupported LLM provider '{}'. Use 'gemini', 'openai' or 'claude'",
                other
            )),
        }
    }
}

/// Embedding provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedProvider {
    /// Google Generative Language embeddings (asymmetric)
    Google,
    /// OpenAI embeddings (symmetric)
    #[serde(rename = "openai")]
    OpenAi,
    /// Credential-free local token-hash encoder
    Local,
}

impl std::fmt::Display for EmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::OpenAi => write!(f, "openai"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for EmbedProvider {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // "gemini" accepted as an alias for operator convenience
            "google" | "gemini" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAi),
            "local" | "sentence-transformers" | "sentence_transformers" => Ok(Self::Local),
            other => Err(format!("Unsupported embedding provider '{}'", other)),
        }
    }
}

/// Product identity substituted into the prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default = "ProductInfo::not_available")]
    pub name: String,
    #[serde(default = "ProductInfo::not_available")]
    pub version: String,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            name: Self::not_available(),
            version: Self::not_available(),
        }
    }
}

impl ProductInfo {
    fn not_available() -> String {
        "N/A".to_string()
    }

    /// Load product info from a JSON file.
    ///
    /// A missing or malformed file degrades to `N/A` values rather than
    /// failing the run.
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => {
                debug!(path = %path.display(), "Product info file not found, using defaults");
                Self::default()
            }
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub gen_provider: GenProvider,
    pub gen_model: String,
    pub gen_api_key: String,
    pub embed_provider: EmbedProvider,
    pub embed_model: String,
    pub embed_api_key: String,
    /// Snapshot path for the vector store, if persistence is wanted.
    pub store_path: Option<PathBuf>,
}

impl RunConfig {
    /// Build configuration from process environment (loading `.env` first).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// The environment-independent entry point; tests feed a map instead
    /// of mutating process globals.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gen_provider = match lookup("LLM_PROVIDER") {
            Some(raw) if !raw.trim().is_empty() => raw.parse().map_err(Error::Config)?,
            _ => GenProvider::default(),
        };

        let (key_var, model_var, default_model) = match gen_provider {
            GenProvider::Gemini => ("GEMINI_API_KEY", "GEMINI_MODEL", defaults::GEMINI_GEN_MODEL),
            GenProvider::OpenAi => ("OPENAI_API_KEY", "OPENAI_MODEL", defaults::OPENAI_GEN_MODEL),
            GenProvider::Claude => (
                "ANTHROPIC_API_KEY",
                "CLAUDE_MODEL",
                defaults::CLAUDE_GEN_MODEL,
            ),
        };

        let gen_api_key = require_key(&lookup, key_var)?;
        let gen_model = lookup(model_var).unwrap_or_else(|| default_model.to_string());

        let embed_provider = match lookup("EMBEDDING_PROVIDER") {
            Some(raw) if !raw.trim().is_empty() => raw.parse().map_err(Error::Config)?,
            _ => gen_provider.default_embed_provider(),
        };

        let (embed_api_key, embed_model) = match embed_provider {
            EmbedProvider::Google => (
                require_key(&lookup, "GEMINI_API_KEY")?,
                lookup("GEMINI_EMBEDDING_MODEL")
                    .unwrap_or_else(|| defaults::GOOGLE_EMBED_MODEL.to_string()),
            ),
            EmbedProvider::OpenAi => (
                require_key(&lookup, "OPENAI_API_KEY")?,
                lookup("OPENAI_EMBEDDING_MODEL")
                    .unwrap_or_else(|| defaults::OPENAI_EMBED_MODEL.to_string()),
            ),
            // The local encoder needs no credential.
            EmbedProvider::Local => (String::new(), defaults::LOCAL_EMBED_MODEL.to_string()),
        };

        let store_path = lookup("SCHEMA_STORE_PATH").map(PathBuf::from);

        Ok(Self {
            gen_provider,
            gen_model,
            gen_api_key,
            embed_provider,
            embed_model,
            embed_api_key,
            store_path,
        })
    }
}

fn require_key(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<String> {
    match lookup(var) {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::Config(format!("API key '{}' is not set", var))),
    }
}
