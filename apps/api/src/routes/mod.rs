pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/jd", post(handlers::handle_upload_jd))
        .route(
            "/resumes",
            post(handlers::handle_upload_resumes).get(handlers::handle_list_resumes),
        )
        .route("/match", get(handlers::handle_match))
        .route("/download/:file_name", get(handlers::handle_download))
        .route("/clear", post(handlers::handle_clear))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
