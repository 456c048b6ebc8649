//! # premark-pipeline
//!
//! The document-processing pipeline: prompt assembly from a master
//! template, structural validation of generated YAML frontmatter, and
//! the orchestrator that walks a batch of documents through
//! retrieve → generate → validate → update.

pub mod orchestrator;
pub mod prompt;
pub mod validate;

pub use orchestrator::{run_with_setup, BatchReport, Orchestrator, RunOptions};
pub use prompt::{load_assets, PromptAssembler, PromptAssets, PromptInputs};
pub use validate::{parse_frontmatter, strip_code_fence, Validated};
