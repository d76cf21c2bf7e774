pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // HTML form flow
        .route("/", get(upload::handle_index))
        .route("/upload", post(upload::handle_upload_form))
        // JSON API
        .route("/api/v1/resumes/extract", post(upload::handle_extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
