//! Ranks every stored resume against one job description.
//!
//! The job is normalized and embedded once. Each resume then gets its own tokio
//! task: the embedding call is awaited on the runtime, and the CPU-bound feature
//! extraction runs under `spawn_blocking` against the shared, immutable engine.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use crate::scoring::{PreparedText, ScoreRecord, ScoringEngine};
use crate::session::ResumeRecord;

/// One ranked resume, flattened as `{file, semantic, ..., final}`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub file: String,
    #[serde(flatten)]
    pub score: ScoreRecord,
}

/// Scores `resumes` concurrently, keeps those with `final >= threshold`, and sorts
/// by final score (desc), then file name (asc) for stable output.
pub async fn rank_resumes(
    engine: Arc<ScoringEngine>,
    jd_text: &str,
    resumes: Vec<ResumeRecord>,
    threshold: f64,
) -> Vec<MatchResult> {
    let total = resumes.len();
    let job = Arc::new(engine.prepare(jd_text).await);

    let mut tasks = JoinSet::new();
    for resume in resumes {
        let engine = Arc::clone(&engine);
        let job = Arc::clone(&job);
        tasks.spawn(async move {
            let score = score_resume(engine, job, &resume.text).await;
            (resume.name, score)
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((file, Ok(score))) if score.final_score >= threshold => {
                results.push(MatchResult { file, score })
            }
            Ok((_, Ok(_))) => {}
            Ok((file, Err(e))) => {
                warn!(file = %file, error = %e, "scoring failed; resume dropped from ranking")
            }
            Err(e) => error!(error = %e, "scoring task failed; resume dropped from ranking"),
        }
    }

    results.sort_by(|a, b| {
        b.score
            .final_score
            .total_cmp(&a.score.final_score)
            .then_with(|| a.file.cmp(&b.file))
    });

    info!(
        scored = total,
        selected = results.len(),
        threshold,
        "ranking complete"
    );
    results
}

/// Embeds one resume, then scores it on the blocking pool.
async fn score_resume(
    engine: Arc<ScoringEngine>,
    job: Arc<PreparedText>,
    resume_text: &str,
) -> Result<ScoreRecord, JoinError> {
    let resume = engine.prepare(resume_text).await;
    tokio::task::spawn_blocking(move || engine.score_prepared(&job, &resume)).await
}
