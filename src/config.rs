use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// On-disk encoding of the network weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// `DenseNetwork` JSON
    #[default]
    Json,
    /// ONNX export (requires the `onnx` feature)
    Onnx,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Onnx => "onnx",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub format: ModelFormat,
    /// Per-feature mean/scale
    pub normalizer_path: PathBuf,
    /// Frozen network weights
    pub weights_path: PathBuf,
    /// Wait-time bucket labels, aligned with the network output
    pub labels_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    /// Probability mass covered by the reported interval (e.g., 0.8 = 80%)
    #[serde(default = "default_interval_coverage")]
    pub interval_coverage: f64,
    /// Number of alternative labels returned beside the point estimate
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_interval_coverage() -> f64 {
    0.8
}

fn default_top_k() -> usize {
    5
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            interval_coverage: default_interval_coverage(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("model.format", "json")?
            .set_default("prediction.interval_coverage", default_interval_coverage())?
            .set_default("prediction.top_k", default_top_k() as i64)?
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("WAITCAST_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (WAITCAST__MODEL__WEIGHTS_PATH, etc.)
            .add_source(
                Environment::with_prefix("WAITCAST")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Configuration pointing at artifacts under `artifact_dir`
    pub fn with_artifact_dir<P: AsRef<Path>>(artifact_dir: P) -> Self {
        let dir = artifact_dir.as_ref();
        Self {
            model: ModelConfig {
                format: ModelFormat::Json,
                normalizer_path: dir.join("scaler.json"),
                weights_path: dir.join("wait_time_model.json"),
                labels_path: dir.join("labels.json"),
            },
            prediction: PredictionConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.prediction.interval_coverage > 0.0 && self.prediction.interval_coverage <= 1.0)
        {
            errors.push("interval_coverage must be in (0, 1]".to_string());
        }

        if self.prediction.top_k == 0 {
            errors.push("top_k must be at least 1".to_string());
        }

        for (name, path) in [
            ("normalizer_path", &self.model.normalizer_path),
            ("weights_path", &self.model.weights_path),
            ("labels_path", &self.model.labels_path),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(format!("model.{name} must not be empty"));
            }
        }

        if cfg!(not(feature = "onnx")) && self.model.format == ModelFormat::Onnx {
            errors.push("model.format = \"onnx\" requires the `onnx` feature".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
