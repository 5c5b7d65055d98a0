//! Probability distribution over wait-time labels and the point-estimate rule.

use serde::Serialize;
use std::collections::BTreeMap;

use super::LABEL_COUNT;
use crate::error::{Result, WaitcastError};
use crate::ml::LabelSpace;

/// Allowed drift of the probability total away from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-4;

/// Model output checked to lie on the probability simplex.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probs: Box<[f64; LABEL_COUNT]>,
}

impl Distribution {
    pub fn from_model_output(output: Vec<f64>) -> Result<Self> {
        let probs: Box<[f64; LABEL_COUNT]> =
            output.into_boxed_slice().try_into().map_err(|rest: Box<[f64]>| {
                WaitcastError::Inference(format!(
                    "model produced {} outputs, expected {LABEL_COUNT}",
                    rest.len()
                ))
            })?;

        if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(WaitcastError::Inference(
                "model produced a negative or non-finite probability".to_string(),
            ));
        }
        let total: f64 = probs.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(WaitcastError::Inference(format!(
                "model output sums to {total}, not a probability distribution"
            )));
        }

        Ok(Self { probs })
    }

    pub fn as_array(&self) -> &[f64; LABEL_COUNT] {
        &self.probs
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }
}

/// Index of the most probable label; equal probabilities resolve to the lowest label.
pub fn select_best(labels: &[i64], probs: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, (&label, &p)) in labels.iter().zip(probs).enumerate() {
        best = match best {
            None => Some(i),
            Some(b) if p > probs[b] || (p == probs[b] && label < labels[b]) => Some(i),
            keep => keep,
        };
    }
    best
}

/// Closed label range grown outward from `best` (in ascending label order)
/// until it holds at least `coverage` of the probability mass. Each step
/// takes the more probable neighbour; ties extend toward lower labels.
pub fn credible_interval(labels: &[i64], probs: &[f64], best: usize, coverage: f64) -> (i64, i64) {
    let mut pairs: Vec<(i64, f64)> = labels.iter().copied().zip(probs.iter().copied()).collect();
    pairs.sort_by_key(|(label, _)| *label);

    let best_label = labels[best];
    let start = pairs
        .iter()
        .position(|(label, _)| *label == best_label)
        .unwrap_or(0);
    let target = coverage.clamp(0.0, 1.0);

    let (mut lo, mut hi) = (start, start);
    let mut mass = pairs[start].1;
    while mass + 1e-12 < target {
        let left = lo.checked_sub(1).map(|i| pairs[i].1);
        let right = pairs.get(hi + 1).map(|p| p.1);
        match (left, right) {
            (Some(l), Some(r)) if r > l => {
                hi += 1;
                mass += r;
            }
            (Some(l), _) => {
                lo -= 1;
                mass += l;
            }
            (None, Some(r)) => {
                hi += 1;
                mass += r;
            }
            (None, None) => break,
        }
    }

    (pairs[lo].0, pairs[hi].0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelProbability {
    pub label: i64,
    pub probability: f64,
}

/// Point estimate together with the full distribution it was taken from.
#[derive(Debug, Clone)]
pub struct PredictionResult<'a> {
    labels: &'a LabelSpace,
    distribution: Distribution,
    best: usize,
}

impl<'a> PredictionResult<'a> {
    pub fn new(labels: &'a LabelSpace, distribution: Distribution) -> Result<Self> {
        let best = select_best(labels.as_slice(), distribution.as_array()).ok_or_else(|| {
            WaitcastError::Inference("cannot select a label from an empty label space".into())
        })?;
        Ok(Self {
            labels,
            distribution,
            best,
        })
    }

    pub fn best_label(&self) -> i64 {
        self.labels.as_slice()[self.best]
    }

    pub fn best_probability(&self) -> f64 {
        self.distribution.as_array()[self.best]
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.labels
            .as_slice()
            .iter()
            .copied()
            .zip(self.distribution.as_array().iter().copied())
    }

    pub fn probability_of(&self, label: i64) -> Option<f64> {
        self.iter().find(|(l, _)| *l == label).map(|(_, p)| p)
    }

    /// Label → probability, as consumed by callers.
    pub fn to_map(&self) -> BTreeMap<i64, f64> {
        self.iter().collect()
    }

    /// Probability-weighted mean label.
    pub fn expected_label(&self) -> f64 {
        self.iter().map(|(label, p)| label as f64 * p).sum()
    }

    /// Most probable labels, highest first; ties by lower label.
    pub fn top_k(&self, k: usize) -> Vec<LabelProbability> {
        let mut pairs: Vec<(i64, f64)> = self.iter().collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        pairs
            .into_iter()
            .take(k)
            .map(|(label, probability)| LabelProbability { label, probability })
            .collect()
    }

    pub fn interval(&self, coverage: f64) -> (i64, i64) {
        credible_interval(
            self.labels.as_slice(),
            self.distribution.as_array(),
            self.best,
            coverage,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> Vec<f64> {
        vec![1.0 / LABEL_COUNT as f64; LABEL_COUNT]
    }

    fn labels_descending() -> LabelSpace {
        let labels: Vec<i64> = (0..LABEL_COUNT as i64).rev().collect();
        LabelSpace::new(labels, LABEL_COUNT).unwrap()
    }

    #[test]
    fn select_best_prefers_lowest_label_on_ties() {
        assert_eq!(select_best(&[30, 10, 20], &[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(select_best(&[30, 10, 20], &[0.5, 0.25, 0.25]), Some(0));
        assert_eq!(select_best(&[], &[]), None);
    }

    #[test]
    fn uniform_distribution_picks_lowest_label() {
        let labels = labels_descending();
        let dist = Distribution::from_model_output(uniform()).unwrap();
        let result = PredictionResult::new(&labels, dist).unwrap();

        assert_eq!(result.best_label(), 0);
        assert_eq!(result.to_map().len(), LABEL_COUNT);
    }

    #[test]
    fn rejects_outputs_off_the_simplex() {
        let err = Distribution::from_model_output(vec![0.5; 3]).unwrap_err();
        assert!(err.to_string().contains("expected 1696"));

        let mut unnormalized = uniform();
        unnormalized[0] += 0.01;
        assert!(Distribution::from_model_output(unnormalized).is_err());

        let mut negative = uniform();
        negative[0] = -negative[0];
        negative[1] *= 3.0;
        assert!(Distribution::from_model_output(negative).is_err());

        let mut nan = uniform();
        nan[5] = f64::NAN;
        assert!(Distribution::from_model_output(nan).is_err());
    }

    #[test]
    fn interval_grows_toward_heavier_neighbour() {
        let labels = [10, 20, 30, 40, 50];
        let probs = [0.05, 0.1, 0.5, 0.3, 0.05];
        let best = select_best(&labels, &probs).unwrap();

        assert_eq!(credible_interval(&labels, &probs, best, 0.5), (30, 30));
        assert_eq!(credible_interval(&labels, &probs, best, 0.8), (30, 40));
        assert_eq!(credible_interval(&labels, &probs, best, 0.9), (20, 40));
        assert_eq!(credible_interval(&labels, &probs, best, 1.0), (10, 50));
    }

    #[test]
    fn interval_uses_label_order_not_output_order() {
        let labels = [50, 10, 30, 20, 40];
        let probs = [0.05, 0.05, 0.5, 0.1, 0.3];
        let best = select_best(&labels, &probs).unwrap();
        assert_eq!(credible_interval(&labels, &probs, best, 0.8), (30, 40));
    }

    #[test]
    fn summary_statistics() {
        let labels = LabelSpace::new((0..LABEL_COUNT as i64).collect(), LABEL_COUNT).unwrap();
        let mut probs = vec![0.0; LABEL_COUNT];
        probs[10] = 0.25;
        probs[20] = 0.75;
        let result =
            PredictionResult::new(&labels, Distribution::from_model_output(probs).unwrap())
                .unwrap();

        assert_eq!(result.best_label(), 20);
        assert_eq!(result.best_probability(), 0.75);
        assert!((result.expected_label() - 17.5).abs() < 1e-9);
        assert_eq!(result.probability_of(10), Some(0.25));
        assert_eq!(result.probability_of(-1), None);

        let top = result.top_k(3);
        assert_eq!(top[0].label, 20);
        assert_eq!(top[1].label, 10);
        // Remaining labels all have zero mass; the lowest wins.
        assert_eq!(top[2].label, 0);
    }
}
