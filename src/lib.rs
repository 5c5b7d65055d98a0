pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod ml;
pub mod validation;

pub use config::AppConfig;
pub use domain::{PatientQueue, QueueEntry, TriageCategory, TriageCounts};
pub use error::{Result, WaitcastError};
pub use estimator::{FeatureVector, PredictionResult, WaitTimeEstimator, WaitTimeReport};
