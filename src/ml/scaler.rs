//! Per-feature z-score normalization fitted offline.
//!
//! Accepts the field names of a scikit-learn `StandardScaler` export
//! (`mean_`, `scale_`) as well as plain `mean` / `scale`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WaitcastError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn from_file<P: AsRef<Path>>(path: P, expected_dim: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WaitcastError::artifact("normalizer", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content, expected_dim)
    }

    pub fn from_json(content: &str, expected_dim: usize) -> Result<Self> {
        let scaler: Self = serde_json::from_str(content)
            .map_err(|e| WaitcastError::artifact("normalizer", format!("invalid JSON: {e}")))?;
        scaler
            .validate(expected_dim)
            .map_err(|reason| WaitcastError::artifact("normalizer", reason))?;
        Ok(scaler)
    }

    pub fn validate(&self, expected_dim: usize) -> std::result::Result<(), String> {
        if self.mean.len() != expected_dim {
            return Err(format!(
                "mean length {} != feature count {expected_dim}",
                self.mean.len()
            ));
        }
        if self.scale.len() != expected_dim {
            return Err(format!(
                "scale length {} != feature count {expected_dim}",
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err("mean must be finite".to_string());
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("scale must be finite and > 0".to_string());
        }
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// `(x - mean) / scale`, element-wise.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.dim() {
            return Err(WaitcastError::Inference(format!(
                "normalizer input dim mismatch: got {}, expected {}",
                x.len(),
                self.dim()
            )));
        }
        Ok(x
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }
}
