//! Photo → typed dish record pipeline.
//!
//! Delegates visual understanding to a vision language model and turns its
//! free-form textual answer into a strictly-typed, category-conditioned
//! record. The model's output is recovered (`parser`), validated against the
//! detected category's field set (`validate`), and classified into a stable
//! outcome taxonomy (`classify`). `pipeline` composes the steps around a
//! single inference call.

pub mod classify;
pub mod gemini;
pub mod language;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod types;
pub mod validate;

pub use classify::classify;
pub use gemini::{GeminiClient, MockVisionModel, VisionModel};
pub use language::resolve_language;
pub use parser::extract_json;
pub use pipeline::{IdentifyPipeline, IdentifyRequest};
pub use prompt::build_prompt;
pub use types::{
    Calories, Category, CategoryDetails, DishRecord, NameBlock, Pronunciation,
};
pub use validate::validate_record;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("Inference service failure: {0}")]
    Upstream(String),

    #[error("No JSON object recoverable from model response: {0}")]
    MalformedResponse(String),

    #[error("Response JSON violates the record schema: {0}")]
    SchemaViolation(String),

    #[error("Identification cancelled before completion")]
    Cancelled,
}

/// Stable failure kinds surfaced to callers. Schema violations collapse into
/// `MalformedResponse` — both mean the model's answer could not be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    UpstreamError,
    MalformedResponse,
    NotRecognized,
    Cancelled,
}

impl FailureKind {
    /// Wire code used in the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::UpstreamError => "UPSTREAM_ERROR",
            FailureKind::MalformedResponse => "MALFORMED_RESPONSE",
            FailureKind::NotRecognized => "NOT_VIETNAMESE_ITEM",
            FailureKind::Cancelled => "CANCELLED",
        }
    }
}

/// Result of one identification call. Created fresh per call; either a fully
/// validated record or a typed failure, never a partially populated record.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(DishRecord),
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl From<IdentifyError> for Outcome {
    fn from(err: IdentifyError) -> Self {
        let kind = match err {
            IdentifyError::Upstream(_) => FailureKind::UpstreamError,
            IdentifyError::MalformedResponse(_) | IdentifyError::SchemaViolation(_) => {
                FailureKind::MalformedResponse
            }
            IdentifyError::Cancelled => FailureKind::Cancelled,
        };
        let message = err.to_string();
        Outcome::Failure { kind, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_violation_maps_to_malformed_response() {
        let outcome: Outcome = IdentifyError::SchemaViolation("missing field".into()).into();
        match outcome {
            Outcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::MalformedResponse);
                assert!(message.contains("missing field"));
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn upstream_error_keeps_message_verbatim() {
        let outcome: Outcome = IdentifyError::Upstream("connection refused".into()).into();
        match outcome {
            Outcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::UpstreamError);
                assert!(message.contains("connection refused"));
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn failure_kind_wire_codes() {
        assert_eq!(FailureKind::NotRecognized.code(), "NOT_VIETNAMESE_ITEM");
        assert_eq!(FailureKind::MalformedResponse.code(), "MALFORMED_RESPONSE");
        assert_eq!(FailureKind::UpstreamError.code(), "UPSTREAM_ERROR");
        assert_eq!(FailureKind::Cancelled.code(), "CANCELLED");
    }
}
