//! ONNX inference wrapper (pure Rust via `tract-onnx`).
//!
//! Lets a network exported straight from the training framework be served
//! without converting it to the JSON dense format.

use std::path::Path;

use super::ProbabilityModel;
use crate::error::{Result, WaitcastError};

use tract_onnx::prelude::*;

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: Vec<usize>,
    output_dim: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_shape", &self.input_shape)
            .field("output_dim", &self.output_dim)
            .finish()
    }
}

fn load_err(reason: String) -> WaitcastError {
    WaitcastError::artifact("weights", reason)
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a fixed `[1, input_dim]` f32 input.
    ///
    /// The output width is discovered with a probe pass over a zero input.
    pub fn load_for_vec_input<P: AsRef<Path>>(path: P, input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(load_err("input_dim must be > 0".to_string()));
        }
        let input_shape = [1, input_dim];

        let model = tract_onnx::onnx()
            .model_for_path(path.as_ref())
            .map_err(|e| load_err(format!("onnx load failed: {e}")))?;

        let model = model
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)))
            .map_err(|e| load_err(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| load_err(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| load_err(format!("onnx runnable failed: {e}")))?;

        let dummy =
            tract_ndarray::ArrayD::<f32>::zeros(tract_ndarray::IxDyn(&input_shape)).into_tvalue();
        let outputs = plan
            .run(tvec!(dummy))
            .map_err(|e| load_err(format!("onnx probe run failed: {e}")))?;
        let out0 = outputs
            .first()
            .ok_or_else(|| load_err("onnx produced no outputs".to_string()))?;
        let output_dim = out0
            .to_array_view::<f32>()
            .map_err(|e| load_err(format!("onnx output decode failed: {e}")))?
            .len();
        if output_dim == 0 {
            return Err(load_err("onnx output has zero elements".to_string()));
        }

        Ok(Self {
            plan,
            input_shape: input_shape.to_vec(),
            output_dim,
        })
    }

    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// Run inference on a single feature vector.
    pub fn run(&self, input: &[f32]) -> Result<Vec<f32>> {
        let expected: usize = self.input_shape.iter().product();
        if input.len() != expected {
            return Err(WaitcastError::Inference(format!(
                "onnx input dim mismatch: got {}, expected {} (shape={:?})",
                input.len(),
                expected,
                self.input_shape
            )));
        }

        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&self.input_shape),
            input.to_vec(),
        )
        .map_err(|e| WaitcastError::Inference(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| WaitcastError::Inference(format!("onnx run failed: {e}")))?;
        let out0 = outputs
            .first()
            .ok_or_else(|| WaitcastError::Inference("onnx produced no outputs".to_string()))?;

        let arr = out0
            .to_array_view::<f32>()
            .map_err(|e| WaitcastError::Inference(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().copied().collect())
    }
}

impl ProbabilityModel for OnnxModel {
    fn input_dim(&self) -> usize {
        self.input_shape.last().copied().unwrap_or(0)
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let input: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        Ok(self.run(&input)?.into_iter().map(f64::from).collect())
    }
}
