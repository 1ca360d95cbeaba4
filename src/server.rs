//! HTTP transport for the identification pipeline.
//!
//! `POST /api/identify` accepts either a multipart `image` file field or a
//! JSON body carrying a base64 data-URI, plus an optional `language` field.
//! Responses use the `{success, data}` / `{success, error: {code, message}}`
//! envelope: 2xx for an identified record, 4xx for domain/validation
//! failures, 5xx for upstream/unexpected ones. Payload ceiling: 10 MB of
//! raw image, 15 MB of encoded request body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::identify::{DishRecord, FailureKind, IdentifyPipeline, IdentifyRequest, Outcome};

/// Raw image ceiling. Larger uploads are rejected by the transport layer.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Encoded request body limit (base64 + multipart overhead).
const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SuccessEnvelope {
    success: bool,
    data: DishRecord,
}

#[derive(Serialize)]
struct FailureEnvelope {
    success: bool,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

fn failure_response(status: StatusCode, code: &'static str, message: String) -> Response {
    (
        status,
        Json(FailureEnvelope {
            success: false,
            error: ErrorBody { code, message },
        }),
    )
        .into_response()
}

fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Success(record) => (
            StatusCode::OK,
            Json(SuccessEnvelope {
                success: true,
                data: record,
            }),
        )
            .into_response(),
        Outcome::Failure { kind, message } => {
            let status = match kind {
                FailureKind::NotRecognized | FailureKind::MalformedResponse => {
                    StatusCode::BAD_REQUEST
                }
                FailureKind::UpstreamError => StatusCode::BAD_GATEWAY,
                FailureKind::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
            };
            failure_response(status, kind.code(), message)
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    pipeline: Arc<IdentifyPipeline>,
}

/// Build the API router. Composable so tests can drive it with `oneshot`.
pub fn api_router(pipeline: Arc<IdentifyPipeline>) -> Router {
    Router::new()
        .route("/api/identify", post(handle_identify))
        .route("/api/health", get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(AppState { pipeline })
}

/// Bind and serve until the process is stopped.
pub async fn serve(pipeline: Arc<IdentifyPipeline>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "API server listening");
    axum::serve(listener, api_router(pipeline)).await
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_health() -> Response {
    #[derive(Serialize)]
    struct Health {
        status: &'static str,
        timestamp: String,
    }
    Json(Health {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
    .into_response()
}

/// JSON request body variant: base64 image (optionally a data-URI).
#[derive(Deserialize)]
struct IdentifyBody {
    image: Option<String>,
    language: Option<String>,
}

struct UploadedImage {
    bytes: Vec<u8>,
    mime_type: String,
    language: String,
}

async fn handle_identify(State(state): State<AppState>, request: Request) -> Response {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let upload = if is_multipart {
        read_multipart(request).await
    } else {
        read_json_body(request).await
    };

    let upload = match upload {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return failure_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            format!("Image too large. Maximum {}MB.", MAX_IMAGE_BYTES / (1024 * 1024)),
        );
    }

    let outcome = state
        .pipeline
        .identify(IdentifyRequest {
            image: &upload.bytes,
            mime_type: &upload.mime_type,
            language_code: &upload.language,
        })
        .await;

    outcome_response(outcome)
}

fn missing_image() -> Response {
    failure_response(
        StatusCode::BAD_REQUEST,
        "MISSING_IMAGE",
        "No image provided. Please upload an image.".into(),
    )
}

async fn read_multipart(request: Request) -> Result<UploadedImage, Response> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| failure_response(StatusCode::BAD_REQUEST, "MISSING_IMAGE", e.to_string()))?;

    let mut image: Option<(Vec<u8>, String)> = None;
    let mut language = String::from("en");

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or("") {
            "image" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => image = Some((bytes.to_vec(), mime_type)),
                    Err(e) => {
                        tracing::warn!("failed to read upload bytes: {e}");
                        return Err(failure_response(
                            StatusCode::BAD_REQUEST,
                            "MISSING_IMAGE",
                            "Failed to read image data.".into(),
                        ));
                    }
                }
            }
            "language" => {
                language = field.text().await.unwrap_or_else(|_| "en".into());
            }
            _ => {}
        }
    }

    let (bytes, mime_type) = image.ok_or_else(missing_image)?;
    Ok(UploadedImage {
        bytes,
        mime_type,
        language,
    })
}

async fn read_json_body(request: Request) -> Result<UploadedImage, Response> {
    let Json(body): Json<IdentifyBody> = Json::from_request(request, &())
        .await
        .map_err(|e| failure_response(StatusCode::BAD_REQUEST, "MISSING_IMAGE", e.to_string()))?;

    let encoded = body.image.filter(|s| !s.is_empty()).ok_or_else(missing_image)?;
    let (bytes, mime_type) = decode_data_uri(&encoded).ok_or_else(|| {
        failure_response(
            StatusCode::BAD_REQUEST,
            "MISSING_IMAGE",
            "Image field is not valid base64.".into(),
        )
    })?;

    Ok(UploadedImage {
        bytes,
        mime_type,
        language: body.language.unwrap_or_else(|| "en".into()),
    })
}

/// Decode a `data:image/...;base64,` URI or bare base64 payload.
/// Returns the raw bytes and the MIME type (defaulting to image/jpeg).
fn decode_data_uri(encoded: &str) -> Option<(Vec<u8>, String)> {
    use base64::Engine as _;

    let (mime_type, payload) = match encoded.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest.split_once(";base64,")?;
            let mime = if meta.is_empty() { "image/jpeg" } else { meta };
            (mime.to_string(), payload)
        }
        None => ("image/jpeg".to_string(), encoded),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    Some((bytes, mime_type))
}
