pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use tracing::info;

use crate::error::{Result, WaitcastError};

/// Serve the wait-time API until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting wait-time API on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| WaitcastError::Internal(format!("API server error: {}", e)))?;

    Ok(())
}
