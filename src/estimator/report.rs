use serde::Serialize;
use std::collections::BTreeMap;

use super::{FeatureVector, LabelProbability, PredictionResult};
use crate::config::PredictionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub low: i64,
    pub high: i64,
    pub coverage: f64,
}

/// Caller-facing summary of one estimate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitTimeReport {
    /// Most probable wait-time label.
    pub estimated_wait: i64,
    pub probability: f64,
    pub expected_wait: f64,
    pub confidence_interval: ConfidenceInterval,
    pub alternatives: Vec<LabelProbability>,
    pub distribution: BTreeMap<i64, f64>,
    pub queue_position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_patients: Option<usize>,
    pub triage_level: u8,
}

impl WaitTimeReport {
    pub fn new(
        result: &PredictionResult<'_>,
        features: &FeatureVector,
        total_patients: Option<usize>,
        config: &PredictionConfig,
    ) -> Self {
        let (low, high) = result.interval(config.interval_coverage);
        Self {
            estimated_wait: result.best_label(),
            probability: result.best_probability(),
            expected_wait: result.expected_label(),
            confidence_interval: ConfidenceInterval {
                low,
                high,
                coverage: config.interval_coverage,
            },
            alternatives: result.top_k(config.top_k),
            distribution: result.to_map(),
            queue_position: features.queue_position(),
            total_patients,
            triage_level: features.triage().level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::fixtures;

    #[test]
    fn report_carries_estimate_and_queue_context() {
        let estimator = fixtures::estimator();
        let fv = FeatureVector::from_raw(5, 3, &[1, 1, 2, 0, 0]).unwrap();
        let result = estimator.estimate(&fv).unwrap();
        let config = PredictionConfig {
            interval_coverage: 0.5,
            top_k: 3,
        };

        let report = WaitTimeReport::new(&result, &fv, Some(9), &config);
        assert_eq!(report.estimated_wait, 10);
        assert_eq!(report.queue_position, 5);
        assert_eq!(report.triage_level, 3);
        assert_eq!(report.alternatives.len(), 3);
        assert_eq!(report.alternatives[0].label, 10);
        assert!(report.confidence_interval.low <= 10 && 10 <= report.confidence_interval.high);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["estimatedWait"], 10);
        assert_eq!(json["totalPatients"], 9);
        assert_eq!(json["distribution"].as_object().unwrap().len(), 1696);
    }

    #[test]
    fn omits_total_patients_when_unknown() {
        let estimator = fixtures::estimator();
        let fv = FeatureVector::from_raw(1, 1, &[0, 0, 0, 0, 0]).unwrap();
        let result = estimator.estimate(&fv).unwrap();

        let report = WaitTimeReport::new(&result, &fv, None, &PredictionConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("totalPatients").is_none());
    }
}
