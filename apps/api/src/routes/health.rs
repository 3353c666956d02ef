use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "Backend is running",
        "service": "AI ATS Resume Matcher"
    }))
}

/// GET /health
/// Returns service version and the active embedding backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-api",
        "embedder": state.engine.embedder_name()
    }))
}
