use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; immutable and shared by every request.
    pub pipeline: Arc<ResumePipeline>,
    pub config: Config,
}
