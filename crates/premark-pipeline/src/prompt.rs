//! Prompt assembly from a master template and run-time inputs.
//!
//! Substitution is literal string replacement, not a template language:
//! placeholders the template does not contain are simply never used, and
//! placeholders with no corresponding input stay verbatim in the prompt.

use std::path::Path;

use tracing::{debug, warn};

use premark_core::{Error, Result};

pub const KNOWLEDGE_BASE_PLACEHOLDER: &str = "{{KNOWLEDGE_BASE_CONTENT}}";
pub const SCHEMA_DEFINITIONS_PLACEHOLDER: &str = "{{SCHEMA_DEFINITIONS}}";
pub const MARKDOWN_CONTENT_PLACEHOLDER: &str = "{{MARKDOWN_CONTENT}}";
pub const PRODUCT_NAME_PLACEHOLDER: &str = "{{PRODUCT_NAME}}";
pub const PRODUCT_VERSION_PLACEHOLDER: &str = "{{PRODUCT_VERSION}}";

/// Per-document inputs substituted into the template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub knowledge_base: &'a str,
    pub schema_definitions: &'a str,
    pub markdown_content: &'a str,
    pub product_name: &'a str,
    pub product_version: &'a str,
}

/// Holds the master prompt template for the duration of a run.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    template: String,
}

impl PromptAssembler {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute every known placeholder with its input.
    pub fn assemble(&self, inputs: &PromptInputs<'_>) -> String {
        let prompt = self
            .template
            .replace(KNOWLEDGE_BASE_PLACEHOLDER, inputs.knowledge_base)
            .replace(SCHEMA_DEFINITIONS_PLACEHOLDER, inputs.schema_definitions)
            .replace(MARKDOWN_CONTENT_PLACEHOLDER, inputs.markdown_content)
            .replace(PRODUCT_NAME_PLACEHOLDER, inputs.product_name)
            .replace(PRODUCT_VERSION_PLACEHOLDER, inputs.product_version);
        debug!(prompt_len = prompt.len(), "Assembled prompt");
        prompt
    }
}

/// The master prompt plus concatenated knowledge base, loaded once per run.
#[derive(Debug, Clone)]
pub struct PromptAssets {
    pub template: String,
    pub knowledge_base: String,
}

/// Load the master prompt and knowledge base from `root`.
///
/// Expects `root/config/master_prompt.txt` (missing is fatal) and an
/// optional `root/knowledge_base/` directory whose files are concatenated
/// in name order. Files whose names contain `schemaorg` are skipped: raw
/// ontology dumps belong in the vector index, not inline in the prompt.
pub fn load_assets(root: &Path) -> Result<PromptAssets> {
    let prompt_path = root.join("config").join("master_prompt.txt");
    let template = std::fs::read_to_string(&prompt_path).map_err(|e| {
        Error::Config(format!(
            "Cannot read master prompt {}: {}",
            prompt_path.display(),
            e
        ))
    })?;

    let kb_dir = root.join("knowledge_base");
    let mut knowledge_base = String::new();
    if kb_dir.is_dir() {
        let mut paths: Vec<_> = std::fs::read_dir(&kb_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if file_name.contains("schemaorg") {
                debug!(file = file_name, "Skipping ontology dump in knowledge base");
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            if !knowledge_base.is_empty() {
                knowledge_base.push_str("\n\n");
            }
            knowledge_base.push_str(&content);
        }
    } else {
        warn!(dir = %kb_dir.display(), "No knowledge base directory, continuing without one");
    }

    Ok(PromptAssets {
        template,
        knowledge_base,
    })
}
