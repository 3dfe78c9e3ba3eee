//! File loading and document detection for the CLI. The core never touches
//! the filesystem; everything here is collaborator territory, including the
//! not-found failure mode.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use resbridge_core::definition::Definition;
use resbridge_core::ir::ResourceSchema;

/// What an input path turned out to hold.
#[derive(Debug)]
pub enum Input {
    /// Serializer DSL source text plus the fallback name derived from the
    /// file name.
    Source { text: String, fallback: String },
    /// An already-structured IR document.
    Schema(ResourceSchema),
}

/// Read an input file and classify it by extension: YAML/JSON documents
/// parse as the IR, anything else is source text.
pub fn load_input(path: &Path) -> Result<Input> {
    let text = read(path)?;
    if is_document(path) {
        let schema = parse_schema(path, &text)?;
        return Ok(Input::Schema(schema));
    }
    Ok(Input::Source {
        text,
        fallback: fallback_name(path),
    })
}

/// Read a definition document (YAML or JSON).
pub fn load_definition(path: &Path) -> Result<Definition> {
    let text = read(path)?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse definition {}", path.display()))
    } else {
        serde_yaml_ng::from_str(&text)
            .with_context(|| format!("failed to parse definition {}", path.display()))
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_schema(path: &Path, text: &str) -> Result<ResourceSchema> {
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(text)
            .with_context(|| format!("failed to parse IR document {}", path.display()))
    } else {
        serde_yaml_ng::from_str(text)
            .with_context(|| format!("failed to parse IR document {}", path.display()))
    }
}

fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Fallback resource name for a source file: its stem.
pub fn fallback_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resource")
        .to_string()
}
