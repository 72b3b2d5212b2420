pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

/// Resume batches are multi-file PDF uploads; axum's 2 MB default is too small.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/screenings", post(handlers::handle_submit))
        .route("/api/v1/screenings/latest", get(handlers::handle_latest))
        .route(
            "/api/v1/screenings/latest/uploads",
            get(handlers::handle_latest_uploads),
        )
        .route(
            "/api/v1/screenings/latest/compare",
            post(handlers::handle_compare),
        )
        .route(
            "/api/v1/candidates/analysis",
            post(handlers::handle_analysis),
        )
        .route(
            "/api/v1/candidates/confirmation-email",
            post(handlers::handle_confirmation_email),
        )
        .route("/api/v1/scores/display", get(handlers::handle_display_score))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
