use axum::{extract::State, Json};

use crate::api::{state::AppState, types::HealthResponse};

/// GET /health -- the estimator is loaded before the router exists, so a
/// responding server is always ready to serve estimates.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_seconds(),
        label_count: state.estimator.labels().len(),
        model_format: state.estimator.format().as_str().to_string(),
    })
}
