//! Gemini vision client and the `VisionModel` seam.
//!
//! The pipeline only needs "prompt + image bytes in, text out"; everything
//! else about the inference service stays behind this trait so tests can
//! substitute a mock. Transport and service failures surface as
//! `IdentifyError::Upstream` with the cause preserved.

use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::IdentifyError;
use crate::config::GeminiConfig;

/// Opaque vision-language inference capability.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Run one generation over a prompt and an inline image.
    async fn generate(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, IdentifyError>;
}

// ──────────────────────────────────────────────
// Gemini REST client
// ──────────────────────────────────────────────

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, IdentifyError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IdentifyError::Upstream(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

/// Response body, reduced to the text we consume.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, IdentifyError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(prompt),
                    Part::InlineData(InlineData {
                        mime_type,
                        data: base64::engine::general_purpose::STANDARD.encode(image),
                    }),
                ],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    IdentifyError::Upstream(format!("cannot reach {}", self.base_url))
                } else if e.is_timeout() {
                    IdentifyError::Upstream(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    IdentifyError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentifyError::Upstream(format!(
                "service returned status {}: {}",
                status.as_u16(),
                body.chars().take(300).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| IdentifyError::Upstream(format!("unreadable response body: {e}")))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(IdentifyError::Upstream(
                "service returned no candidate text".into(),
            ));
        }

        Ok(text)
    }
}

// ──────────────────────────────────────────────
// Mock client (testing)
// ──────────────────────────────────────────────

/// Mock vision model — returns a configured response or failure, and records
/// the prompts it was asked to run.
pub struct MockVisionModel {
    response: Result<String, String>,
    seen_prompts: Mutex<Vec<String>>,
}

impl MockVisionModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            seen_prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every call fails upstream with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            seen_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts passed to `generate`, in call order.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.seen_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn generate(
        &self,
        prompt: &str,
        _image: &[u8],
        _mime_type: &str,
    ) -> Result<String, IdentifyError> {
        self.seen_prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(IdentifyError::Upstream(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_response() {
        let mock = MockVisionModel::new("{\"a\":1}");
        let text = mock.generate("prompt", b"img", "image/jpeg").await.unwrap();
        assert_eq!(text, "{\"a\":1}");
        assert_eq!(mock.seen_prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn failing_mock_surfaces_upstream_error() {
        let mock = MockVisionModel::failing("boom");
        let err = mock.generate("p", b"img", "image/png").await.unwrap_err();
        assert!(matches!(err, IdentifyError::Upstream(m) if m == "boom"));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = GeminiConfig {
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com/".into(),
            timeout_secs: 60,
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn request_body_uses_camel_case_inline_data() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text("hello"),
                    Part::InlineData(InlineData {
                        mime_type: "image/jpeg",
                        data: "QUJD".into(),
                    }),
                ],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "QUJD");
    }

    #[test]
    fn response_text_parses() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":1}"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.as_ref().unwrap().parts[0].text, "{\"a\":1}");
    }
}
