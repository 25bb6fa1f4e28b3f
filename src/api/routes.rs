//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    clear_slip, get_slip, health, ready, refresh_slip, render_metrics, submit_slip, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(render_metrics))
        // Slip endpoints
        .route(
            "/api/v1/slip",
            post(submit_slip).get(get_slip).delete(clear_slip),
        )
        .route("/api/v1/slip/refresh", post(refresh_slip))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
