//! Axum route handlers for the matching API.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_text, ExtractionError};
use crate::matching::ranker::{rank_resumes, MatchResult};
use crate::session::{ResumeRecord, Session};
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

type Extractor = fn(&[u8], &str) -> Result<String, ExtractionError>;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JdUploadResponse {
    pub message: String,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: String,
    pub count: usize,
    pub new_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub count: usize,
    pub resumes: Vec<ResumeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub count: usize,
    pub selected: Vec<MatchResult>,
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A file part pulled out of a multipart body.
struct Upload {
    file_name: Option<String>,
    content_type: String,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /jd
///
/// Multipart with either a `text` field or a `file` field; a file wins if both are
/// sent. Replaces the current job description.
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<JdUploadResponse>, AppError> {
    let mut text: Option<String> = None;
    let mut file: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => text = Some(field.text().await?),
            Some("file") => file = Some(read_upload(field).await?),
            _ => {}
        }
    }

    let raw = match (file, text.filter(|t| !t.trim().is_empty())) {
        (Some(upload), _) => extract_blocking(extract_text, upload.data, upload.content_type)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??,
        (None, Some(text)) => text,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either text or file".to_string(),
            ))
        }
    };

    let jd = raw.trim().to_string();
    if jd.is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from file".to_string(),
        ));
    }

    let length = jd.chars().count();
    state.session.write().await.set_jd(jd);
    info!(length, "job description saved");

    Ok(Json(JdUploadResponse {
        message: "JD saved".to_string(),
        length,
    }))
}

/// POST /resumes
///
/// Multipart with one or more `files` fields. Already-stored names, unreadable
/// files and files with no text are skipped.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("files") {
            uploads.push(read_upload(field).await?);
        }
    }

    if uploads.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }

    let records = extract_resumes(&state.session, uploads, extract_text).await;

    let mut session = state.session.write().await;
    let mut new_count = 0;
    for record in records {
        // a name repeated within one request is only kept once
        if session.add_resume(record) {
            new_count += 1;
        }
    }
    let count = session.resumes().len();
    drop(session);

    if new_count == 0 {
        return Err(AppError::Validation(
            "Could not extract text from any resume or all files already uploaded".to_string(),
        ));
    }

    info!(new_count, count, "resumes added");
    Ok(Json(ResumeUploadResponse {
        message: format!("{new_count} new resume(s) added. Total: {count} resumes"),
        count,
        new_count,
    }))
}

/// GET /resumes
pub async fn handle_list_resumes(State(state): State<AppState>) -> Json<ResumeListResponse> {
    let session = state.session.read().await;
    let resumes = session.resumes().to_vec();
    Json(ResumeListResponse {
        count: resumes.len(),
        resumes,
    })
}

/// GET /match?threshold=60
///
/// Scores every stored resume against the job description and returns those at or
/// above the threshold, best first.
pub async fn handle_match(
    State(state): State<AppState>,
    query: Result<Query<MatchQuery>, QueryRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let threshold = query.threshold.unwrap_or(state.config.match_threshold);
    if !threshold.is_finite() {
        return Err(AppError::Validation(
            "threshold must be a finite number".to_string(),
        ));
    }

    let (jd, resumes) = {
        let session = state.session.read().await;
        let jd = session
            .jd()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Upload JD first".to_string()))?;
        if session.resumes().is_empty() {
            return Err(AppError::Validation("Upload resumes first".to_string()));
        }
        (jd, session.resumes().to_vec())
    };

    let selected = rank_resumes(Arc::clone(&state.engine), &jd, resumes, threshold).await;

    Ok(Json(MatchResponse {
        count: selected.len(),
        selected,
        threshold,
    }))
}

/// GET /download/:file_name
///
/// Returns the original uploaded bytes.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let session = state.session.read().await;
    let resume = session
        .find(&file_name)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_header_filename(&resume.name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, resume.content_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        resume.file_data.clone(),
    )
        .into_response())
}

/// POST /clear
pub async fn handle_clear(State(state): State<AppState>) -> Json<MessageResponse> {
    state.session.write().await.clear();
    info!("session cleared");
    Json(MessageResponse {
        message: "All data cleared".to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(field: axum::extract::multipart::Field<'_>) -> Result<Upload, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let data = field.bytes().await?;
    Ok(Upload {
        file_name,
        content_type,
        data,
    })
}

/// Extracts each upload's text, skipping unnamed, already-stored, unreadable and
/// blank files. A panic inside the extractor only costs that one file.
async fn extract_resumes(
    session: &RwLock<Session>,
    uploads: Vec<Upload>,
    extract: Extractor,
) -> Vec<ResumeRecord> {
    let mut records = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let Some(name) = upload.file_name.filter(|n| !n.is_empty()) else {
            warn!("skipping upload without a file name");
            continue;
        };
        if session.read().await.contains(&name) {
            continue;
        }
        let text = match extract_blocking(extract, upload.data.clone(), upload.content_type.clone())
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(file = %name, error = %e, "skipping resume: text extraction failed");
                continue;
            }
            Err(e) => {
                warn!(file = %name, error = %e, "skipping resume: extraction task failed");
                continue;
            }
        };
        if text.trim().is_empty() {
            warn!(file = %name, "skipping resume: no text extracted");
            continue;
        }
        records.push(ResumeRecord::new(name, text, upload.data, upload.content_type));
    }
    records
}

/// PDF parsing is CPU-bound; keep it off the async workers.
async fn extract_blocking(
    extract: Extractor,
    data: Bytes,
    content_type: String,
) -> Result<Result<String, ExtractionError>, JoinError> {
    tokio::task::spawn_blocking(move || extract(&data, &content_type)).await
}

/// Drops characters that cannot appear inside a quoted header parameter.
fn sanitize_header_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}
