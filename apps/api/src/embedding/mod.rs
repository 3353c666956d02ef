//! Embedding capability: maps text to a fixed-length vector.
//!
//! The scoring engine holds an `Arc<dyn Embedder>`, chosen at startup via
//! `EMBEDDING_BACKEND`. Implementations must be deterministic for identical
//! input within a process lifetime so rankings are reproducible.

use async_trait::async_trait;
use thiserror::Error;

pub mod hash;
pub mod http;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<EmbeddingError>,
    },

    #[error("embedding service returned no vectors")]
    EmptyResponse,

    #[error("expected a {expected}-dimensional vector, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend label for logs ("hash", "http").
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
