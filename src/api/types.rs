use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{QueueEntry, RawTriage};
use crate::error::WaitcastError;

// ============================================================================
// Wait-time Types
// ============================================================================

/// Queue state supplied directly by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitTimeRequest {
    pub queue_position: i64,
    pub triage_category: RawTriage,
    /// Patients ahead at each triage level 1..=5
    pub counts: Vec<i64>,
}

/// Every patient at a facility; the queue is derived server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueWaitTimeRequest {
    pub patient_id: i64,
    pub patients: Vec<QueueEntry>,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: i64,
    pub label_count: usize,
    pub model_format: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<WaitcastError> for ApiError {
    fn from(err: WaitcastError) -> Self {
        if err.is_input_error() {
            Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        } else {
            error!(error = %err, "wait-time request failed");
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
