use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // System endpoints
        .route("/health", get(handlers::health_handler))
        // Wait-time endpoints
        .route("/api/wait-time", post(handlers::estimate_wait_time))
        .route("/api/wait-time/queue", post(handlers::estimate_queue_wait_time))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
