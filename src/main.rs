mod main_runtime;

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use waitcast::api::{self, AppState};
use waitcast::cli::{self, Cli, Commands};
use waitcast::config::AppConfig;
use waitcast::estimator::WaitTimeEstimator;

use crate::main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config_dir)?;
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("\x1b[31m✗ config: {e}\x1b[0m");
        }
        anyhow::bail!("invalid configuration ({} problems)", errors.len());
    }

    match &cli.command {
        Some(Commands::Predict(args)) => {
            init_logging_simple();
            cli::run_predict(&config, args)?;
        }
        Some(Commands::Check) => {
            init_logging_simple();
            cli::check_artifacts(&config)?;
        }
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = *port;
            }
            init_logging(&config.logging);
            run_server(&config).await?;
        }
        None => {
            init_logging(&config.logging);
            run_server(&config).await?;
        }
    }

    Ok(())
}

/// Load every artifact, then bind. A failed load never reaches the listener.
async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let estimator = match WaitTimeEstimator::load(&config.model) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            error!(error = %e, "refusing to start: model artifacts failed to load");
            return Err(e.into());
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "estimator ready");

    let state = AppState::new(estimator, config.prediction.clone());
    api::serve(state, addr).await?;
    Ok(())
}
