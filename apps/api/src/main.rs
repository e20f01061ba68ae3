mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod sections;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LlmBackend};
use crate::generation::generator::{ContentGenerator, MockGenerator, RemoteGenerator};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize drafting backend (remote by default, swap via LLM_BACKEND)
    let generator: Arc<dyn ContentGenerator> = match config.llm_backend {
        LlmBackend::Remote => {
            let llm = LlmClient::new(&config.llm_base_url, config.huggingface_token.clone())?;
            if !llm.has_credential() {
                warn!("HUGGINGFACE_TOKEN is not set; generation requests will fail");
            }
            info!(
                "LLM client initialized (model: {}, base: {})",
                LlmClient::model_id(),
                config.llm_base_url
            );
            Arc::new(RemoteGenerator::new(llm))
        }
        LlmBackend::Mock => {
            info!("Using offline mock drafting backend");
            Arc::new(MockGenerator)
        }
    };

    let state = AppState {
        config: config.clone(),
        generator,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the wizard's host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
