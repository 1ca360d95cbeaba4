//! JSON recovery from free-form model output.
//!
//! Vision models wrap their answer in prose or code fences inconsistently,
//! so recovery is an explicit ordered-fallback chain rather than a single
//! pattern: fenced block → outer brace span → whole text. A parse failure at
//! one stage falls through to the next; the first successful parse wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::IdentifyError;

/// Fenced code block (optionally tagged `json`) containing a `{...}` span.
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").unwrap()
});

/// Max bytes of raw text carried in a `MalformedResponse` diagnostic.
const DIAGNOSTIC_LIMIT: usize = 200;

/// Recover a single JSON value from raw model output.
pub fn extract_json(raw: &str) -> Result<Value, IdentifyError> {
    // Stage 1: fenced code block
    if let Some(captures) = FENCED_JSON.captures(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(&captures[1]) {
            return Ok(value);
        }
    }

    // Stage 2: greedy outer-object span (first '{' through last '}')
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&raw[start..=end]) {
                return Ok(value);
            }
        }
    }

    // Stage 3: the whole text
    serde_json::from_str::<Value>(raw)
        .map_err(|_| IdentifyError::MalformedResponse(truncate_for_diagnostics(raw)))
}

/// Truncate raw text for error diagnostics, keeping char boundaries intact.
fn truncate_for_diagnostics(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() <= DIAGNOSTIC_LIMIT {
        return trimmed.to_string();
    }
    let mut cut = DIAGNOSTIC_LIMIT;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &trimmed[..cut])
}
