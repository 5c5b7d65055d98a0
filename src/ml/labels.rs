//! Ordered wait-time bucket labels aligned with the model's output vector.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, WaitcastError};

/// Output index `i` of the model corresponds to `labels[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<i64>,
}

impl LabelSpace {
    pub fn new(labels: Vec<i64>, expected_len: usize) -> Result<Self> {
        if labels.len() != expected_len {
            return Err(WaitcastError::artifact(
                "labels",
                format!("expected {expected_len} labels, got {}", labels.len()),
            ));
        }
        let mut seen = HashSet::with_capacity(labels.len());
        if let Some(dup) = labels.iter().find(|l| !seen.insert(**l)) {
            return Err(WaitcastError::artifact(
                "labels",
                format!("label {dup} appears more than once"),
            ));
        }
        Ok(Self { labels })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, expected_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WaitcastError::artifact("labels", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content, expected_len)
    }

    pub fn from_json(content: &str, expected_len: usize) -> Result<Self> {
        let labels: Vec<i64> = serde_json::from_str(content)
            .map_err(|e| WaitcastError::artifact("labels", format!("invalid JSON: {e}")))?;
        Self::new(labels, expected_len)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.labels.get(index).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_positional_order() {
        let labels = LabelSpace::from_json("[30, 5, 120]", 3).unwrap();
        assert_eq!(labels.get(0), Some(30));
        assert_eq!(labels.get(2), Some(120));
        assert_eq!(labels.get(3), None);
    }

    #[test]
    fn rejects_wrong_length_and_duplicates() {
        let err = LabelSpace::new(vec![1, 2, 3], 1696).unwrap_err();
        assert!(err.is_startup_error());
        assert!(err.to_string().contains("expected 1696 labels"));

        let err = LabelSpace::new(vec![1, 2, 2], 3).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
