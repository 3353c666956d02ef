use anyhow::{bail, Context, Result};

use crate::embedding::hash::DEFAULT_DIMENSION;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which embedding capability backs the semantic feature.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingBackend {
    /// Local feature hashing; no external service.
    Hash,
    /// Remote text-embeddings-inference style endpoint.
    Http { url: String, api_key: Option<String> },
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_dimension: usize,
    pub vocabulary_path: Option<String>,
    pub match_threshold: f64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            rust_log: "info".to_string(),
            embedding_backend: EmbeddingBackend::Hash,
            embedding_dimension: DEFAULT_DIMENSION,
            vocabulary_path: None,
            match_threshold: 60.0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let embedding_backend = match lookup("EMBEDDING_BACKEND").as_deref() {
            None | Some("hash") => EmbeddingBackend::Hash,
            Some("http") => EmbeddingBackend::Http {
                url: require(&lookup, "EMBEDDING_URL")?,
                api_key: lookup("EMBEDDING_API_KEY").filter(|k| !k.is_empty()),
            },
            Some(other) => bail!("EMBEDDING_BACKEND must be 'hash' or 'http', got '{other}'"),
        };

        let embedding_dimension: usize = parse_or(&lookup, "EMBEDDING_DIMENSION", defaults.embedding_dimension)?;
        if embedding_dimension == 0 {
            bail!("EMBEDDING_DIMENSION must be greater than zero");
        }

        let match_threshold: f64 = parse_or(&lookup, "MATCH_THRESHOLD", defaults.match_threshold)?;
        if !match_threshold.is_finite() {
            bail!("MATCH_THRESHOLD must be a finite number");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            embedding_backend,
            embedding_dimension,
            vocabulary_path: lookup("VOCABULARY_PATH").filter(|p| !p.is_empty()),
            match_threshold,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
