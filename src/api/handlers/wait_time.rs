use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{
    state::AppState,
    types::{ApiError, QueueWaitTimeRequest, WaitTimeRequest},
};
use crate::domain::PatientQueue;
use crate::estimator::{FeatureVector, WaitTimeReport};

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::new(rejection.status(), rejection.body_text())
}

fn report(
    state: &AppState,
    features: &FeatureVector,
    total_patients: Option<usize>,
) -> Result<WaitTimeReport, ApiError> {
    let result = state.estimator.estimate(features)?;
    Ok(WaitTimeReport::new(
        &result,
        features,
        total_patients,
        &state.prediction,
    ))
}

/// POST /api/wait-time
pub async fn estimate_wait_time(
    State(state): State<AppState>,
    payload: Result<Json<WaitTimeRequest>, JsonRejection>,
) -> Result<Json<WaitTimeReport>, ApiError> {
    let Json(req) = payload.map_err(reject_body)?;

    let triage = req.triage_category.level()?;
    let features = FeatureVector::from_raw(req.queue_position, triage, &req.counts)?;

    Ok(Json(report(&state, &features, None)?))
}

/// POST /api/wait-time/queue
pub async fn estimate_queue_wait_time(
    State(state): State<AppState>,
    payload: Result<Json<QueueWaitTimeRequest>, JsonRejection>,
) -> Result<Json<WaitTimeReport>, ApiError> {
    let Json(req) = payload.map_err(reject_body)?;

    let queue = PatientQueue::new(req.patients)?;
    let snapshot = queue.snapshot_for(req.patient_id)?;
    let features = FeatureVector::from(&snapshot);

    Ok(Json(report(
        &state,
        &features,
        Some(snapshot.total_patients),
    )?))
}
