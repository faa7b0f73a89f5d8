// Main entry point for the audit API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit::{MarketSearcher, SerpApiSearcher, AI};
use server_core::config::Config;
use server_core::kernel::OpenAiAnalyst;
use server_core::server::build_app;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,audit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Brand Audit API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Wire up collaborators
    let ai: Arc<dyn AI> = Arc::new(
        OpenAiAnalyst::new(config.openai_api_key.clone())
            .with_models(config.extractor_model.clone(), config.analyst_model.clone()),
    );
    let searcher: Arc<dyn MarketSearcher> =
        Arc::new(SerpApiSearcher::new(config.serpapi_api_key.clone()));

    // Build application
    let app = build_app(ai, searcher);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!(
        "Workflow endpoint: http://localhost:{}/api/chat/workflow",
        config.port
    );
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
