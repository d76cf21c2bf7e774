mod config;
mod errors;
mod extraction;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, NerBackend};
use crate::extraction::patterns::PatternSet;
use crate::extraction::{
    EntityRecognizer, HeuristicEntityRecognizer, HttpEntityRecognizer, ResumePipeline,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Staging area for uploads
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;
    info!("Uploads staged in {}", config.upload_dir.display());

    // The blocking HTTP client behind the NER adapter must be built off the runtime.
    let pipeline_config = config.clone();
    let pipeline = tokio::task::spawn_blocking(move || build_pipeline(&pipeline_config)).await??;
    info!(
        "Extraction pipeline initialized (NER backend: {})",
        pipeline.ner_backend()
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Compiles the pattern library and constructs the configured NER engine.
fn build_pipeline(config: &Config) -> Result<ResumePipeline> {
    let patterns = PatternSet::new().context("Failed to compile extraction patterns")?;

    let recognizer: Box<dyn EntityRecognizer> = match config.ner_backend {
        NerBackend::Heuristic => Box::new(
            HeuristicEntityRecognizer::new().context("Failed to build heuristic recognizer")?,
        ),
        NerBackend::Http => {
            let url = config
                .ner_service_url
                .clone()
                .context("NER_SERVICE_URL must be set when NER_BACKEND=http")?;
            info!("Using NER service at {url}");
            Box::new(HttpEntityRecognizer::new(
                url,
                Duration::from_secs(config.ner_timeout_secs),
            )?)
        }
    };

    Ok(ResumePipeline::new(patterns, recognizer))
}
