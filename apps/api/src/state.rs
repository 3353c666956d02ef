use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::scoring::ScoringEngine;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; shared by every concurrent scoring task.
    pub engine: Arc<ScoringEngine>,
    /// Single global session (JD + uploaded resumes).
    pub session: Arc<RwLock<Session>>,
    pub config: Config,
}

impl AppState {
    pub fn new(engine: ScoringEngine, config: Config) -> Self {
        Self {
            engine: Arc::new(engine),
            session: Arc::new(RwLock::new(Session::default())),
            config,
        }
    }
}
