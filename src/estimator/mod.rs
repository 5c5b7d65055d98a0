//! Wait-time estimation path: features → normalizer → frozen network → decision rule.
//!
//! A `WaitTimeEstimator` only exists once every artifact has loaded and
//! passed its shape checks. After construction it is immutable and shared
//! as `Arc<WaitTimeEstimator>` across request handlers.

pub mod decision;
pub mod features;
pub mod report;

pub use decision::{Distribution, LabelProbability, PredictionResult};
pub use features::{FeatureVector, FEATURE_COUNT};
pub use report::{ConfidenceInterval, WaitTimeReport};

use std::time::Instant;
use tracing::{debug, info};

use crate::config::{ModelConfig, ModelFormat};
use crate::error::{Result, WaitcastError};
use crate::ml::{Activation, DenseNetwork, LabelSpace, ProbabilityModel, StandardScaler};

/// Number of discrete wait-time buckets the network scores.
pub const LABEL_COUNT: usize = 1696;

/// Declared network widths, input first.
pub const ARCHITECTURE: [usize; 4] = [FEATURE_COUNT, 128, 64, LABEL_COUNT];

pub const ACTIVATIONS: [Activation; 3] = [Activation::Relu, Activation::Relu, Activation::Softmax];

#[derive(Debug)]
pub struct WaitTimeEstimator {
    normalizer: StandardScaler,
    model: Box<dyn ProbabilityModel>,
    labels: LabelSpace,
    format: ModelFormat,
}

impl WaitTimeEstimator {
    /// Load all three artifacts named in `config`.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let normalizer = StandardScaler::from_file(&config.normalizer_path, FEATURE_COUNT)?;
        let labels = LabelSpace::from_file(&config.labels_path, LABEL_COUNT)?;

        let estimator = match config.format {
            ModelFormat::Json => {
                let network = DenseNetwork::from_file(&config.weights_path)?;
                Self::from_dense(normalizer, network, labels)?
            }
            ModelFormat::Onnx => Self::load_onnx(normalizer, labels, config)?,
        };

        info!(
            format = ?estimator.format,
            normalizer_path = %config.normalizer_path.display(),
            weights_path = %config.weights_path.display(),
            labels_path = %config.labels_path.display(),
            input_dim = FEATURE_COUNT,
            label_count = LABEL_COUNT,
            "loaded wait-time estimator"
        );
        Ok(estimator)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(
        normalizer: StandardScaler,
        labels: LabelSpace,
        config: &ModelConfig,
    ) -> Result<Self> {
        let model = crate::ml::OnnxModel::load_for_vec_input(&config.weights_path, FEATURE_COUNT)?;
        Self::from_parts(normalizer, Box::new(model), labels, ModelFormat::Onnx)
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(_: StandardScaler, _: LabelSpace, _: &ModelConfig) -> Result<Self> {
        Err(WaitcastError::artifact(
            "weights",
            "model.format = \"onnx\" requires building with the `onnx` feature",
        ))
    }

    /// Assemble from a JSON dense network, checking it layer by layer.
    pub fn from_dense(
        normalizer: StandardScaler,
        network: DenseNetwork,
        labels: LabelSpace,
    ) -> Result<Self> {
        network
            .validate()
            .and_then(|_| network.ensure_architecture(&ARCHITECTURE, &ACTIVATIONS))
            .map_err(|reason| WaitcastError::artifact("weights", reason))?;
        Self::from_parts(normalizer, Box::new(network), labels, ModelFormat::Json)
    }

    pub fn from_parts(
        normalizer: StandardScaler,
        model: Box<dyn ProbabilityModel>,
        labels: LabelSpace,
        format: ModelFormat,
    ) -> Result<Self> {
        normalizer
            .validate(FEATURE_COUNT)
            .map_err(|reason| WaitcastError::artifact("normalizer", reason))?;
        if model.input_dim() != FEATURE_COUNT {
            return Err(WaitcastError::artifact(
                "weights",
                format!(
                    "input width {} != feature count {FEATURE_COUNT}",
                    model.input_dim()
                ),
            ));
        }
        if model.output_dim() != LABEL_COUNT {
            return Err(WaitcastError::artifact(
                "weights",
                format!(
                    "output width {} != label count {LABEL_COUNT}",
                    model.output_dim()
                ),
            ));
        }
        if labels.len() != LABEL_COUNT {
            return Err(WaitcastError::artifact(
                "labels",
                format!("expected {LABEL_COUNT} labels, got {}", labels.len()),
            ));
        }

        Ok(Self {
            normalizer,
            model,
            labels,
            format,
        })
    }

    pub fn format(&self) -> ModelFormat {
        self.format
    }

    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    pub fn estimate(&self, features: &FeatureVector) -> Result<PredictionResult<'_>> {
        let started = Instant::now();

        let normalized = self.normalizer.transform(&features.values())?;
        let output = self.model.predict(&normalized)?;
        let distribution = Distribution::from_model_output(output)?;
        let result = PredictionResult::new(&self.labels, distribution)?;

        debug!(
            queue_position = features.queue_position(),
            triage = features.triage().level(),
            best_label = result.best_label(),
            best_probability = result.best_probability(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "wait-time estimate"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::ml::DenseLayer;

    /// Sparse deterministic weights with the declared architecture.
    ///
    /// Only the position feature reaches the head: class `o` scores
    /// `-|o - 10| * 0.05 * x0`, so label 10 wins whenever `x0 > 0` and a
    /// zero `x0` yields the uniform distribution.
    pub fn network() -> DenseNetwork {
        let layer = |out_dim: usize,
                     in_dim: usize,
                     activation: Activation,
                     f: &dyn Fn(usize, usize) -> f64| DenseLayer {
            weights: (0..out_dim)
                .map(|o| (0..in_dim).map(|i| f(o, i)).collect())
                .collect(),
            bias: vec![0.0; out_dim],
            activation,
        };

        DenseNetwork {
            input_dim: FEATURE_COUNT,
            layers: vec![
                layer(128, FEATURE_COUNT, Activation::Relu, &|o, i| {
                    if o == 0 && i == 0 {
                        1.0
                    } else {
                        0.0
                    }
                }),
                layer(64, 128, Activation::Relu, &|o, i| {
                    if o == 0 && i == 0 {
                        1.0
                    } else {
                        0.0
                    }
                }),
                layer(LABEL_COUNT, 64, Activation::Softmax, &|o, i| {
                    if i == 0 {
                        -((o as f64) - 10.0).abs() * 0.05
                    } else {
                        0.0
                    }
                }),
            ],
            metadata: serde_json::json!({ "fixture": true }),
        }
    }

    pub fn normalizer() -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    /// Label `i` is `i` minutes.
    pub fn labels() -> LabelSpace {
        LabelSpace::new((0..LABEL_COUNT as i64).collect(), LABEL_COUNT).expect("fixture labels")
    }

    pub fn estimator() -> WaitTimeEstimator {
        WaitTimeEstimator::from_dense(normalizer(), network(), labels()).expect("fixture estimator")
    }
}
