pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML flow
        .route("/", get(handlers::handle_index))
        .route("/sessions/:id", get(handlers::handle_session_page))
        .route(
            "/sessions/:id/analyze",
            post(handlers::handle_session_submit),
        )
        // JSON API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_start_analysis),
        )
        .with_state(state)
}
