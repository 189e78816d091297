//! JSON encoding of list elements, shared by every backend.

use domains::{DomainError, Idea, Result};

pub fn encode(idea: &Idea) -> Result<String> {
    serde_json::to_string(idea).map_err(|e| DomainError::Storage(format!("encode idea {}: {e}", idea.id)))
}

/// Decodes a whole list. One undecodable element fails the load, because
/// skipping it would shift every later position.
pub fn decode_all(raw: &[String]) -> Result<Vec<Idea>> {
    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_str(item)
                .map_err(|e| DomainError::Storage(format!("decode idea at {index}: {e}")))
        })
        .collect()
}
