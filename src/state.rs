use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;
use crate::extraction::QuestionExtractor;
use crate::review::ReviewSessions;
use crate::storage::MaterialStorage;
use crate::stores::QuestionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,

    /// Transient review sessions, one per educator.
    pub sessions: Arc<ReviewSessions>,

    /// External collaborators behind trait seams.
    pub extractor: Arc<dyn QuestionExtractor>,
    pub questions: Arc<dyn QuestionStore>,
    pub storage: Arc<MaterialStorage>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
