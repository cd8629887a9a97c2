// src/server/initialization.rs

//! Handles server initialization: state setup and listener binding.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::Result;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Initializes all server components before starting the supervision loop.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);

    let state = ServerState::new(config);
    info!("Server state initialized.");

    let listener =
        TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    info!(
        "Taskwire server listening on {}:{} (socket endpoint at {})",
        state.config.host, state.config.port, state.config.socket_path
    );

    Ok(ServerContext {
        state,
        listener,
        background_tasks: JoinSet::new(),
    })
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    match config.idle_timeout {
        Some(limit) => info!("Idle sessions are closed after {:?}.", limit),
        None => warn!(
            "WARNING: No 'idle_timeout' is active. A silent peer holds its session open indefinitely."
        ),
    }
    if config.collaborator.connection_string.is_none() {
        warn!(
            "No collaborator connection string configured. The employee CRUD API will be unavailable."
        );
    }
}
