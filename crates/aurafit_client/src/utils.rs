//! Helpers for turning raw model output into typed values.

use serde::de::DeserializeOwned;

use crate::CoachError;

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```).
///
/// Models sometimes wrap JSON in a fence even when a JSON mime type was
/// requested.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    }
    if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parse model text as JSON of the expected shape.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, CoachError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        let snippet: String = cleaned.chars().take(120).collect();
        CoachError::MalformedPayload(format!("{e}: {snippet}"))
    })
}

/// Trimmed description, or `InvalidInput` when nothing is left.
pub fn require_description(description: &str) -> Result<&str, CoachError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(CoachError::InvalidInput("description is empty".into()));
    }
    Ok(trimmed)
}
