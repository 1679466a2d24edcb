//! Definition reader: text document -> [`AgentDefinition`].

use super::model::AgentDefinition;
use crate::error::ApiError;
use std::io::ErrorKind;
use std::path::Path;

/// Parse a definition document.
///
/// Commented-out list items are plain YAML comments and therefore absent from
/// the result, which is how the deleted-files opt-in works.
pub fn read_definition(text: &str) -> Result<AgentDefinition, ApiError> {
    if text.trim().is_empty() {
        return Ok(AgentDefinition::default());
    }
    serde_yaml::from_str(text)
        .map_err(|e| ApiError::Serialization(format!("Failed to decode YAML data: {}", e)))
}

/// Read and parse a definition document from disk.
pub fn read_definition_file(path: &Path) -> Result<AgentDefinition, ApiError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => ApiError::Serialization(format!(
            "Document {} is not valid UTF-8: {}",
            path.display(),
            e
        )),
        _ => ApiError::FileNotFound {
            path: path.display().to_string(),
            source: e,
        },
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Read definition document");
    read_definition(&text)
}
