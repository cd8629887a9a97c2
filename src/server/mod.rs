// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;

mod acceptor;
mod context;
mod initialization;
mod supervisor;

pub use acceptor::{build_router, serve};
pub use context::ServerContext;

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config) -> Result<()> {
    // 1. Initialize server state and bind the listener.
    let ctx = initialization::setup(config).await?;

    // 2. Run the supervision loop. This function will run until shutdown.
    supervisor::run(ctx).await
}
