pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/check-api-key", get(health::check_api_key_handler))
        // Screening flow
        .route(
            "/api/analyze-job-description",
            post(handlers::handle_analyze_job_description),
        )
        .route(
            "/api/update-requirements",
            post(handlers::handle_update_requirements),
        )
        .route(
            "/api/current-requirements",
            get(handlers::handle_current_requirements),
        )
        .route(
            "/api/analyze-resumes",
            post(handlers::handle_analyze_resumes).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/export-csv", get(handlers::handle_export_csv))
        .with_state(state)
}
