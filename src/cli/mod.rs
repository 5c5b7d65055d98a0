//! Waitcast CLI
//!
//! Commands:
//! - `waitcast serve`   - Load artifacts and serve the wait-time API
//! - `waitcast predict` - One-shot estimate from queue numbers
//! - `waitcast check`   - Validate artifacts and exit

pub mod predict;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use predict::{check_artifacts, run_predict, PredictArgs};

/// Emergency-department wait-time estimator
#[derive(Parser, Debug)]
#[command(name = "waitcast")]
#[command(author, version, about = "Emergency-department wait-time estimator")]
pub struct Cli {
    /// Directory holding default.toml and environment overrides
    #[arg(long, global = true, default_value = "config", env = "WAITCAST_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load model artifacts and serve the HTTP API (default)
    Serve {
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Estimate a single patient's wait time
    Predict(PredictArgs),

    /// Load and validate model artifacts, then exit
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_counts_list() {
        let cli = Cli::parse_from([
            "waitcast",
            "predict",
            "--position",
            "5",
            "--triage",
            "3",
            "--counts",
            "1,1,2,0,0",
        ]);
        match cli.command {
            Some(Commands::Predict(args)) => {
                assert_eq!(args.position, 5);
                assert_eq!(args.triage, "3");
                assert_eq!(args.counts, vec![1, 1, 2, 0, 0]);
                assert_eq!(args.top, None);
            }
            other => panic!("expected predict command, got {other:?}"),
        }
        assert_eq!(cli.config_dir, PathBuf::from("config"));
    }

    #[test]
    fn serve_is_optional_and_takes_port() {
        let cli = Cli::parse_from([
            "waitcast",
            "--config-dir",
            "/etc/waitcast",
            "serve",
            "--port",
            "9000",
        ]);
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
        assert_eq!(cli.config_dir, PathBuf::from("/etc/waitcast"));

        let cli = Cli::parse_from(["waitcast"]);
        assert!(cli.command.is_none());
    }
}
