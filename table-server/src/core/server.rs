//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use std::time::Duration;

use crate::api;
use crate::core::{Config, ServerState};

/// Time allowed for queued follow-ups after the listener stops
const FOLLOW_UP_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let (state, follow_up) = ServerState::initialize(&self.config).await?;
        let app = api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("table-server listening on {addr} (env: {})", self.config.environment);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // the router owned the last state clones; the worker now drains and exits
        match tokio::time::timeout(FOLLOW_UP_DRAIN_TIMEOUT, follow_up).await {
            Ok(Ok(())) => tracing::info!("Follow-up worker drained"),
            Ok(Err(e)) => tracing::error!(error = %e, "Follow-up worker panicked"),
            Err(_) => tracing::warn!("Follow-up worker still busy at shutdown"),
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down...");
}
