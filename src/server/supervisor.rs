// src/server/supervisor.rs

//! Contains the main supervision loop: runs the socket endpoint, reacts to
//! signals, and drives graceful shutdown.

use super::acceptor;
use super::context::ServerContext;
use anyhow::{Result, anyhow};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info, warn};

/// Runs the server until a shutdown signal or a fatal endpoint error, then
/// tears everything down. A failure inside any single session never reaches
/// this loop; only the endpoint itself ending is fatal.
pub async fn run(ctx: ServerContext) -> Result<()> {
    let ServerContext {
        state,
        listener,
        mut background_tasks,
    } = ctx;

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow!("Failed to register SIGINT handler: {}", e))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow!("Failed to register SIGTERM handler: {}", e))?;

    let endpoint_state = state.clone();
    let endpoint_shutdown_rx = state.shutdown_tx.subscribe();
    background_tasks
        .spawn(async move { acceptor::serve(listener, endpoint_state, endpoint_shutdown_rx).await });

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }

            Some(res) = background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {e:?}. Shutting down."); break; }
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all sessions.");
    if state.shutdown_tx.send(()).is_err() {
        debug!("No live receivers for the shutdown signal.");
    }

    if tokio::time::timeout(Duration::from_secs(10), async {
        while background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for the socket endpoint to drain.");
    }
    info!("Server shutdown complete.");
    Ok(())
}
