//! Server startup

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::api;
use crate::config::constants::VERSION;
use crate::state::AppState;

/// Runtime options from the command line
#[derive(Debug, Default)]
pub struct RuntimeConfig {
    /// Override the listening port from the environment
    pub port_override: Option<u16>,
}

/// Initialize state and serve the HTTP API until the process exits.
pub async fn serve(runtime: RuntimeConfig) {
    let state = Arc::new(AppState::new());
    let port = runtime.port_override.unwrap_or(state.config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, version = VERSION, "repo-deploy-agent listening");

    if let Err(e) = axum::serve(listener, api::router(state)).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
