mod config;
mod embedding;
mod errors;
mod extraction;
mod matching;
mod routes;
mod scoring;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbeddingBackend};
use crate::embedding::{Embedder, HashEmbedder, HttpEmbedder};
use crate::routes::build_router;
use crate::scoring::{FeatureWeights, ScoringEngine, Vocabulary};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS matcher API v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_json_file(path)
            .with_context(|| format!("failed to load vocabulary from {path}"))?,
        None => Vocabulary::default(),
    };
    info!(
        skills = vocabulary.skills.len(),
        education = vocabulary.education.len(),
        "Vocabulary loaded"
    );

    let embedder = build_embedder(&config)?;
    info!(
        backend = embedder.name(),
        dimension = embedder.dimension(),
        "Embedder initialized"
    );

    let engine = ScoringEngine::new(embedder, vocabulary, FeatureWeights::default())
        .context("invalid scoring configuration")?;
    info!(weights = ?engine.weights(), "Scoring engine ready");

    let state = AppState::new(engine, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    Ok(match &config.embedding_backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.embedding_dimension)),
        EmbeddingBackend::Http { url, api_key } => Arc::new(
            HttpEmbedder::new(url.clone(), api_key.clone(), config.embedding_dimension)
                .context("failed to build embedding HTTP client")?,
        ),
    })
}
