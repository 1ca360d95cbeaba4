use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vietlens::config::{self, GeminiConfig};
use vietlens::identify::{GeminiClient, IdentifyPipeline};
use vietlens::server;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let gemini = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let port = match config::server_port() {
        Ok(port) => port,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let client = match GeminiClient::new(&gemini) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("cannot construct inference client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let pipeline = Arc::new(IdentifyPipeline::new(Arc::new(client)));

    tracing::info!(model = %gemini.model, "inference client ready");

    if let Err(err) = server::serve(pipeline, port).await {
        tracing::error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
