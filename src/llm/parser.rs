//! Turn generated text into a World State
//!
//! Structured-output endpoints normally return bare JSON, but some models
//! still wrap it in a Markdown fence. Prose around the object is a parse
//! failure, not something to repair.

use crate::core::error::{CodexError, Result};
use crate::world::WorldState;

/// Longest response excerpt quoted in a parse error
const EXCERPT_CHARS: usize = 300;

/// Extract the JSON object from a model response
///
/// Trims the text and strips one surrounding Markdown fence. Anything else
/// around the object is left in place for the JSON parser to reject.
pub fn extract_json(response: &str) -> Result<&str> {
    let trimmed = response.trim();

    let body = if trimmed.len() >= 6 && trimmed.starts_with("```") && trimmed.ends_with("```") {
        let inner = &trimmed[3..trimmed.len() - 3];
        if inner.trim_start().starts_with('{') {
            inner.trim()
        } else {
            // Skip the info string ("json") up to the end of the line
            match inner.find('\n') {
                Some(newline) => inner[newline + 1..].trim(),
                None => inner.trim(),
            }
        }
    } else {
        trimmed
    };

    if !body.starts_with('{') {
        return Err(CodexError::Parse("No JSON object found in response".into()));
    }
    Ok(body)
}

/// Parse a model response into a World State
///
/// Fails with [`CodexError::Parse`] when the text is not JSON or does not
/// have the World State shape. Nothing is corrected client-side.
pub fn parse_world_state(response: &str) -> Result<WorldState> {
    let json = extract_json(response)?;
    serde_json::from_str(json).map_err(|e| {
        let excerpt: String = json.chars().take(EXCERPT_CHARS).collect();
        CodexError::Parse(format!(
            "Response does not match the World State shape: {} - Response: {}",
            e, excerpt
        ))
    })
}
