//! Command-line identification of a single photo.
//!
//! Usage: identify <image-path> [language-code]
//!
//! Prints the wire envelope as pretty JSON and exits non-zero on failure,
//! so the binary can be scripted against directly.

use std::process::ExitCode;
use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use vietlens::config::{self, GeminiConfig};
use vietlens::identify::{GeminiClient, IdentifyPipeline, IdentifyRequest, Outcome};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: identify <image-path> [language-code]");
        return ExitCode::FAILURE;
    };
    let language = args.next().unwrap_or_else(|| "en".to_string());

    let image = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mime_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    let gemini = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let client = match GeminiClient::new(&gemini) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let pipeline = IdentifyPipeline::new(Arc::new(client));

    let outcome = pipeline
        .identify(IdentifyRequest {
            image: &image,
            mime_type: &mime_type,
            language_code: &language,
        })
        .await;

    let (envelope, code) = match outcome {
        Outcome::Success(record) => (json!({ "success": true, "data": record }), ExitCode::SUCCESS),
        Outcome::Failure { kind, message } => (
            json!({
                "success": false,
                "error": { "code": kind.code(), "message": message }
            }),
            ExitCode::FAILURE,
        ),
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("cannot serialize result: {err}");
            return ExitCode::FAILURE;
        }
    }
    code
}
