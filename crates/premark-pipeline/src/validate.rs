//! Structural validation of generated frontmatter.
//!
//! Models wrap YAML in Markdown code fences often enough that stripping
//! one is part of the contract. Validation is structural only: the text
//! must parse as YAML with a mapping at the top level. Invalid output is
//! a per-document verdict, never an error that could abort a batch.

use premark_core::Frontmatter;

/// Verdict on one generated response.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid(Frontmatter),
    /// Reason the output was rejected, for logging.
    Invalid(String),
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }
}

/// Remove a leading ```` ``` ```` fence (with optional language tag) and
/// the matching trailing fence. Text without a fence is returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_fence) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The rest of the fence line is a language tag; drop the whole line.
    // A single-line fenced response keeps only the tag stripped.
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence.strip_prefix("yaml").unwrap_or(after_fence),
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a generated response into frontmatter.
///
/// A YAML parse failure or a non-mapping top level (scalar, list, null)
/// yields `Invalid` with the reason.
pub fn parse_frontmatter(raw: &str) -> Validated {
    let text = strip_code_fence(raw);
    match serde_yaml::from_str::<serde_yaml::Value>(text) {
        Ok(serde_yaml::Value::Mapping(mapping)) => Validated::Valid(mapping),
        Ok(other) => Validated::Invalid(format!(
            "Top-level YAML must be a mapping, got {}",
            yaml_kind(&other)
        )),
        Err(e) => Validated::Invalid(format!("YAML parse error: {}", e)),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}
