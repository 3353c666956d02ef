//! Scoring engine: ranks a resume against a job description.
//!
//! Pipeline: normalize both texts once → five independent feature extractors →
//! weighted combination → `ScoreRecord` scaled to [0, 100].
//!
//! The engine is stateless after construction and is shared as `Arc<ScoringEngine>`
//! across concurrent scoring tasks. Extractors never fail; see [`fallback`] for the
//! neutral value each one substitutes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::embedding::Embedder;

pub mod fallback;
pub mod features;
pub mod lexical;
pub mod normalize;
pub mod similarity;
pub mod stop_words;
pub mod vocabulary;
pub mod weights;

pub use normalize::normalize;
pub use vocabulary::{Vocabulary, VocabularyError};
pub use weights::FeatureWeights;

use fallback::{SEMANTIC_DEGENERATE, SEMANTIC_UNAVAILABLE};
use similarity::cosine_similarity;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid combiner weights: {0}")]
    InvalidWeights(String),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Raw feature scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScores {
    pub semantic: f64,
    pub lexical: f64,
    pub skills: f64,
    pub education: f64,
    pub experience: f64,
}

impl FeatureScores {
    /// Weighted sum, clamped to [0, 1].
    pub fn combine(&self, weights: &FeatureWeights) -> f64 {
        (weights.semantic * self.semantic
            + weights.lexical * self.lexical
            + weights.skills * self.skills
            + weights.education * self.education
            + weights.experience * self.experience)
            .clamp(0.0, 1.0)
    }
}

/// Score breakdown returned to callers. Every field is in [0, 100], 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub semantic: f64,
    pub keywords: f64,
    pub skills: f64,
    pub education: f64,
    pub experience: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

impl ScoreRecord {
    fn from_features(features: &FeatureScores, weights: &FeatureWeights) -> Self {
        Self {
            semantic: to_percent(features.semantic),
            keywords: to_percent(features.lexical),
            skills: to_percent(features.skills),
            education: to_percent(features.education),
            experience: to_percent(features.experience),
            final_score: to_percent(features.combine(weights)),
        }
    }
}

/// Scales a [0, 1] score to [0, 100] and rounds to 2 decimals.
fn to_percent(score: f64) -> f64 {
    let scaled = (score * 100.0).min(100.0);
    (scaled * 100.0).round() / 100.0
}

/// Text normalized and embedded once. A job description is prepared once and
/// reused across every resume it is ranked against.
#[derive(Debug, Clone)]
pub struct PreparedText {
    pub normalized: String,
    /// `None` when the embedder failed for this text.
    pub embedding: Option<Vec<f32>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoringEngine {
    embedder: Arc<dyn Embedder>,
    vocabulary: Vocabulary,
    weights: FeatureWeights,
}

impl ScoringEngine {
    /// Validates the vocabulary and weights; either being invalid is a startup error.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vocabulary: Vocabulary,
        weights: FeatureWeights,
    ) -> Result<Self, ScoringError> {
        vocabulary.validate()?;
        weights.validate()?;
        Ok(Self {
            embedder,
            vocabulary,
            weights,
        })
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Scores one resume against one job description.
    #[cfg(test)]
    pub async fn score(&self, jd_text: &str, resume_text: &str) -> ScoreRecord {
        let job = self.prepare(jd_text).await;
        let resume = self.prepare(resume_text).await;
        self.score_prepared(&job, &resume)
    }

    /// Normalizes and embeds `text`. The only await point of a scoring call.
    pub async fn prepare(&self, text: &str) -> PreparedText {
        let normalized = normalize(text);
        let embedding = self.embed_or_log(&normalized).await;
        PreparedText {
            normalized,
            embedding,
        }
    }

    /// CPU-bound part of scoring: TF-IDF fit and the vocabulary scans.
    pub fn score_prepared(&self, job: &PreparedText, resume: &PreparedText) -> ScoreRecord {
        self.score_normalized(
            &job.normalized,
            &resume.normalized,
            job.embedding.as_deref(),
            resume.embedding.as_deref(),
        )
    }

    /// Synchronous core once both embeddings are known (or known to be missing).
    pub fn score_normalized(
        &self,
        jd: &str,
        resume: &str,
        jd_embedding: Option<&[f32]>,
        resume_embedding: Option<&[f32]>,
    ) -> ScoreRecord {
        let features = self.features(jd, resume, jd_embedding, resume_embedding);
        debug!(?features, "feature scores");
        ScoreRecord::from_features(&features, &self.weights)
    }

    pub fn features(
        &self,
        jd: &str,
        resume: &str,
        jd_embedding: Option<&[f32]>,
        resume_embedding: Option<&[f32]>,
    ) -> FeatureScores {
        FeatureScores {
            semantic: semantic_similarity(jd_embedding, resume_embedding),
            lexical: lexical::lexical_similarity(jd, resume),
            skills: features::skill_coverage(jd, resume, &self.vocabulary),
            education: features::education_adequacy(jd, resume, &self.vocabulary),
            experience: features::experience_adequacy(jd, resume),
        }
    }

    /// Empty text never reaches the backend: it embeds to the zero vector, which
    /// scores as degenerate whatever the backend would have said about it.
    async fn embed_or_log(&self, normalized: &str) -> Option<Vec<f32>> {
        if normalized.is_empty() {
            debug!("empty text; using the zero vector");
            return Some(vec![0.0; self.embedder.dimension()]);
        }
        match self.embedder.embed(normalized).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(
                    embedder = self.embedder.name(),
                    error = %e,
                    "embedding failed; semantic score will use its fallback"
                );
                None
            }
        }
    }
}

/// Cosine of the two embeddings clamped to [0, 1], with the semantic fallbacks applied.
pub fn semantic_similarity(jd: Option<&[f32]>, resume: Option<&[f32]>) -> f64 {
    let (Some(jd), Some(resume)) = (jd, resume) else {
        return SEMANTIC_UNAVAILABLE;
    };
    if jd.len() != resume.len() || is_zero(jd) || is_zero(resume) {
        return SEMANTIC_DEGENERATE;
    }
    cosine_similarity(jd, resume).clamp(0.0, 1.0)
}

fn is_zero(v: &[f32]) -> bool {
    v.iter().all(|x| *x == 0.0)
}
