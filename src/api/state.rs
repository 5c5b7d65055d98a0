use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::PredictionConfig;
use crate::estimator::WaitTimeEstimator;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded, immutable estimator
    pub estimator: Arc<WaitTimeEstimator>,

    /// Report shaping (interval coverage, alternatives)
    pub prediction: Arc<PredictionConfig>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(estimator: Arc<WaitTimeEstimator>, prediction: PredictionConfig) -> Self {
        Self {
            estimator,
            prediction: Arc::new(prediction),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
