//! Lightweight ML utilities (deploy-safe inference).
//!
//! Everything here is CPU-only and loaded once; inference takes `&self` and
//! never mutates the loaded parameters.

pub mod dense;
pub mod labels;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use dense::{Activation, DenseLayer, DenseNetwork};
pub use labels::LabelSpace;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use scaler::StandardScaler;

use crate::error::Result;

/// A frozen model mapping a feature vector to one score per output class.
pub trait ProbabilityModel: Send + Sync + std::fmt::Debug {
    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;
}
