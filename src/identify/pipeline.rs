//! Orchestrates one identification: resolve language → build prompt →
//! single inference call → extract → validate → classify.
//!
//! Each call is an independent unit of work; the pipeline holds no mutable
//! state and may be shared across concurrent callers. No retry loop lives
//! here — callers needing retry repeat the whole call.

use std::sync::Arc;

use tokio::sync::oneshot;

use super::gemini::VisionModel;
use super::language::resolve_language;
use super::parser::extract_json;
use super::prompt::build_prompt;
use super::{classify, FailureKind, Outcome};

/// One identification request. The image is borrowed for the duration of the
/// call and not retained afterwards.
#[derive(Debug, Clone, Copy)]
pub struct IdentifyRequest<'a> {
    pub image: &'a [u8],
    pub mime_type: &'a str,
    pub language_code: &'a str,
}

/// Stateless orchestrator over a shared vision model client.
pub struct IdentifyPipeline {
    model: Arc<dyn VisionModel>,
}

impl IdentifyPipeline {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Identify the item in a photo. Exactly one inference call per
    /// invocation; the first failure short-circuits.
    pub async fn identify(&self, request: IdentifyRequest<'_>) -> Outcome {
        let display_language = resolve_language(request.language_code);
        tracing::debug!(
            language = display_language,
            mime = request.mime_type,
            image_size = request.image.len(),
            "starting identification"
        );
        let start = std::time::Instant::now();

        let prompt = build_prompt(display_language);

        let raw = match self
            .model
            .generate(&prompt, request.image, request.mime_type)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "inference call failed");
                return err.into();
            }
        };

        let outcome = match extract_json(&raw) {
            Ok(value) => classify(&value),
            Err(err) => err.into(),
        };

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            success = outcome.is_success(),
            "identification complete"
        );
        outcome
    }

    /// Identify, aborting when `cancel` fires. An aborted call drops the
    /// in-flight inference request and yields `Cancelled`; no partial record
    /// is ever surfaced.
    pub async fn identify_with_cancel(
        &self,
        request: IdentifyRequest<'_>,
        cancel: oneshot::Receiver<()>,
    ) -> Outcome {
        tokio::select! {
            outcome = self.identify(request) => outcome,
            _ = cancel => {
                tracing::info!("identification cancelled by caller");
                Outcome::failure(FailureKind::Cancelled, "identification cancelled")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::gemini::MockVisionModel;
    use crate::identify::types::Category;
    use crate::identify::IdentifyError;
    use async_trait::async_trait;

    fn food_response_fr() -> &'static str {
        r#"```json
{
  "category": "food",
  "name": {
    "vietnamese": "Phở Bò",
    "english": "Soupe de nouilles au bœuf",
    "pronunciation": {
      "ipa": "/fəː˧˩˧ ɓɔː˨˩/",
      "simplified": "feu beu",
      "toneGuide": "ton descendant puis remontant"
    }
  },
  "description": "Une soupe de nouilles de riz au bœuf, parfumée aux épices.",
  "ingredients": ["nouilles de riz", "bœuf", "anis étoilé"],
  "calories": { "estimate": 450, "range": "400-500 kcal" },
  "allergens": ["gluten"],
  "culturalNote": "Petit-déjeuner emblématique du Vietnam.",
  "confidence": 0.95,
  "spiceLevel": "mild",
  "servingStyle": "servi avec herbes et citron vert"
}
```"#
    }

    fn request<'a>(language: &'a str) -> IdentifyRequest<'a> {
        IdentifyRequest {
            image: b"fake-jpeg-bytes",
            mime_type: "image/jpeg",
            language_code: language,
        }
    }

    #[tokio::test]
    async fn end_to_end_success_in_french() {
        let mock = Arc::new(MockVisionModel::new(food_response_fr()));
        let pipeline = IdentifyPipeline::new(mock.clone());

        let outcome = pipeline.identify(request("fr")).await;
        let record = match outcome {
            Outcome::Success(record) => record,
            Outcome::Failure { kind, message } => panic!("failed: {kind:?} {message}"),
        };
        assert_eq!(record.category, Category::Food);
        assert!(record.name.vietnamese.contains('ở'));
        assert!(record.description.contains("soupe de nouilles"));

        // One inference call, prompt built for the resolved language.
        let prompts = mock.seen_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("in French"));
    }

    #[tokio::test]
    async fn non_json_response_is_malformed() {
        let pipeline = IdentifyPipeline::new(Arc::new(MockVisionModel::new("I see bread")));
        match pipeline.identify(request("en")).await {
            Outcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::MalformedResponse),
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn upstream_failure_short_circuits_before_extraction() {
        let pipeline =
            IdentifyPipeline::new(Arc::new(MockVisionModel::failing("503 overloaded")));
        match pipeline.identify(request("en")).await {
            Outcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::UpstreamError);
                assert!(message.contains("503 overloaded"));
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn not_recognized_passes_suggestion_through() {
        let response = r#"{"error": "NOT_VIETNAMESE_ITEM", "suggestion": "a sandwich"}"#;
        let pipeline = IdentifyPipeline::new(Arc::new(MockVisionModel::new(response)));
        match pipeline.identify(request("en")).await {
            Outcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::NotRecognized);
                assert_eq!(message, "a sandwich");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn unknown_language_code_prompts_in_english() {
        let mock = Arc::new(MockVisionModel::new(food_response_fr()));
        let pipeline = IdentifyPipeline::new(mock.clone());
        let _ = pipeline.identify(request("xx")).await;
        assert!(mock.seen_prompts()[0].contains("in English"));
    }

    #[tokio::test]
    async fn cancel_yields_cancelled_outcome() {
        /// A model that never answers until the test ends.
        struct StalledModel;

        #[async_trait]
        impl crate::identify::gemini::VisionModel for StalledModel {
            async fn generate(
                &self,
                _prompt: &str,
                _image: &[u8],
                _mime_type: &str,
            ) -> Result<String, IdentifyError> {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }

        let pipeline = IdentifyPipeline::new(Arc::new(StalledModel));
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        match pipeline.identify_with_cancel(request("en"), rx).await {
            Outcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::Cancelled),
            Outcome::Success(_) => panic!("expected cancellation"),
        }
    }
}
