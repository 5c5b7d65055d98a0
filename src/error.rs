use thiserror::Error;

/// Main error type for the wait-time estimator
#[derive(Error, Debug)]
pub enum WaitcastError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Startup artifact errors (fatal; the estimator never serves when these occur)
    #[error("Artifact error ({artifact}): {reason}")]
    Artifact { artifact: String, reason: String },

    // Per-request errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Inference error: {0}")]
    Inference(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl WaitcastError {
    pub fn artifact(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Artifact {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    /// Errors that must stop the process before it serves any request.
    pub fn is_startup_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Artifact { .. })
    }

    /// Errors caused by caller-supplied data.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias for WaitcastError
pub type Result<T> = std::result::Result<T, WaitcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_kinds() {
        let startup = WaitcastError::artifact("labels", "expected 1696 labels, got 3");
        assert!(startup.is_startup_error());
        assert!(!startup.is_input_error());
        assert_eq!(
            startup.to_string(),
            "Artifact error (labels): expected 1696 labels, got 3"
        );

        let input = WaitcastError::InvalidInput("triage category 6 outside 1..=5".into());
        assert!(input.is_input_error());
        assert!(!input.is_startup_error());
    }
}
