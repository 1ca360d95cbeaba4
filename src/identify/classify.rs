//! Outcome classification for a recovered JSON value.
//!
//! A domain error is a *valid-JSON* negative identification: the model
//! understood the request but found no matching Vietnamese item. It is kept
//! distinct from malformed output so the caller can tell "try another photo"
//! apart from "the model misbehaved".

use serde_json::Value;

use super::validate::validate_record;
use super::{FailureKind, Outcome};

/// Error codes the model may use for a negative identification.
/// "NOT_FOOD" is the legacy code from before drinks/desserts/snacks existed.
const NOT_RECOGNIZED_CODES: &[&str] = &["NOT_VIETNAMESE_ITEM", "NOT_FOOD"];

/// Shown when the model reports a non-domain item without a suggestion.
const DEFAULT_SUGGESTION: &str =
    "The image doesn't appear to contain Vietnamese food/drink. Please try another photo.";

/// Classify a recovered JSON value into the final outcome.
pub fn classify(value: &Value) -> Outcome {
    if let Some(code) = value.get("error").and_then(Value::as_str) {
        if NOT_RECOGNIZED_CODES.contains(&code) {
            let message = value
                .get("suggestion")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_SUGGESTION);
            return Outcome::failure(FailureKind::NotRecognized, message);
        }
    }

    match validate_record(value) {
        Ok(record) => Outcome::Success(record),
        Err(err) => err.into(),
    }
}
