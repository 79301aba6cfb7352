mod compiler;
mod config;
mod errors;
mod generation;
mod llm_client;
mod pipeline;
mod posting;
mod profile;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing ANTHROPIC_API_KEY stops startup here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dossier API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Models: fast={} smart={}; profile dir {}; output dir {}",
        config.models.fast,
        config.models.smart,
        config.profile_dir.display(),
        config.output_dir.display()
    );

    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized");

    let port = config.port;
    let state = AppState::new(config, llm)?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
