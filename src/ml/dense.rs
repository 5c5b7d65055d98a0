//! Dense neural network inference (CPU-only).
//!
//! Supports small MLPs loaded from JSON, such as the wait-time classifier
//! (7 → 128 → 64 → 1696 with a softmax head).
//!
//! Design goals:
//! - Stable, deterministic, dependency-light.
//! - Explicit shape validation (fail fast at load, never per request).

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ProbabilityModel;
use crate::error::{Result, WaitcastError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    /// Normalizes the whole layer output onto the probability simplex.
    Softmax,
}

impl Default for Activation {
    fn default() -> Self {
        Self::Linear
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn in_dim(&self) -> usize {
        self.weights.first().map(|r| r.len()).unwrap_or(0)
    }

    fn out_dim(&self) -> usize {
        self.weights.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    /// Expected input dimension.
    pub input_dim: usize,

    pub layers: Vec<DenseLayer>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseNetwork {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WaitcastError::artifact("weights", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(content)
            .map_err(|e| WaitcastError::artifact("weights", format!("invalid JSON: {e}")))?;
        model
            .validate()
            .map_err(|reason| WaitcastError::artifact("weights", reason))?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }
        Ok(())
    }

    /// Widths along the network, input first: `[input_dim, out_0, out_1, ...]`.
    pub fn layer_dims(&self) -> Vec<usize> {
        std::iter::once(self.input_dim)
            .chain(self.layers.iter().map(|l| l.out_dim()))
            .collect()
    }

    pub fn activations(&self) -> Vec<Activation> {
        self.layers.iter().map(|l| l.activation).collect()
    }

    /// Check the loaded network against a declared architecture.
    pub fn ensure_architecture(
        &self,
        dims: &[usize],
        activations: &[Activation],
    ) -> std::result::Result<(), String> {
        let actual = self.layer_dims();
        if actual != dims {
            return Err(format!(
                "layer widths {actual:?} do not match declared architecture {dims:?}"
            ));
        }
        let actual = self.activations();
        if actual != activations {
            return Err(format!(
                "activations {actual:?} do not match declared architecture {activations:?}"
            ));
        }
        Ok(())
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(WaitcastError::Inference(format!(
                "DenseNetwork input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }

        let mut x: Vec<f64> = input.to_vec();

        for layer in &self.layers {
            let out_dim = layer.out_dim();
            let in_dim = layer.in_dim();

            let mut y = vec![0.0_f64; out_dim];
            for o in 0..out_dim {
                let mut sum = layer.bias[o];
                // weights[o] is the o-th row (len = in_dim)
                let row = &layer.weights[o];
                debug_assert_eq!(row.len(), in_dim);
                for i in 0..in_dim {
                    sum += row[i] * x[i];
                }
                y[o] = sum;
            }
            apply_activation(&mut y, layer.activation);
            x = y;
        }

        Ok(x)
    }
}

impl ProbabilityModel for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        DenseNetwork::output_dim(self)
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }
}

fn apply_activation(y: &mut [f64], act: Activation) {
    match act {
        Activation::Linear => {}
        Activation::Relu => y.iter_mut().for_each(|v| *v = v.max(0.0)),
        Activation::Tanh => y.iter_mut().for_each(|v| *v = v.tanh()),
        Activation::Sigmoid => y.iter_mut().for_each(|v| *v = sigmoid(*v)),
        Activation::Softmax => softmax(y),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

fn softmax(y: &mut [f64]) {
    // Shift by the max so exp never overflows.
    let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for v in y.iter_mut() {
        *v = (*v - max).exp();
        total += *v;
    }
    for v in y.iter_mut() {
        *v /= total;
    }
}
