//! Remote embedder for a text-embeddings-inference style `/embed` endpoint.
//!
//! Request:  `{"inputs": "<text>", "truncate": true}`
//! Response: `[[f32, ...]]` (one vector per input)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::embedding::{Embedder, EmbeddingError};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    api_key: Option<String>,
    dimension: usize,
    retry_base_delay: Duration,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        api_key: Option<String>,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            dimension,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Retries transport errors, 429 and 5xx with exponential backoff (1s, 2s, ...).
    /// Any other non-success status fails at once.
    async fn request(&self, text: &str) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbedRequest {
            inputs: text,
            truncate: true,
        };

        let mut attempt = 1;
        loop {
            let mut request = self.client.post(&self.url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let error = match request.send().await {
                Err(e) => EmbeddingError::Http(e),
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json().await?);
                    }
                    let error = EmbeddingError::Api {
                        status: status.as_u16(),
                        message: response.text().await.unwrap_or_default(),
                    };
                    if status != StatusCode::TOO_MANY_REQUESTS && !status.is_server_error() {
                        return Err(error);
                    }
                    error
                }
            };

            if attempt == MAX_ATTEMPTS {
                return Err(EmbeddingError::RetriesExhausted {
                    attempts: MAX_ATTEMPTS,
                    last: Box::new(error),
                });
            }

            let delay = self.retry_base_delay * (1 << (attempt - 1));
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "embedding call failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vectors = self.request(text).await?;
        let vector = first_vector(vectors, self.dimension)?;
        debug!(dimension = vector.len(), "embedding received");
        Ok(vector)
    }
}

/// Takes the single vector out of a batch response and checks its length.
fn first_vector(vectors: Vec<Vec<f32>>, expected: usize) -> Result<Vec<f32>, EmbeddingError> {
    let vector = vectors
        .into_iter()
        .next()
        .ok_or(EmbeddingError::EmptyResponse)?;
    if vector.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(vector)
}
