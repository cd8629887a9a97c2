// src/server/acceptor.rs

//! The connection acceptor: mounts the upgrade endpoint on the shared
//! listener and turns each accepted upgrade into a running `SocketSession`.

use crate::connection::SocketSession;
use crate::core::TaskWireError;
use crate::core::state::{ClientInfo, ServerState};
use axum::Router;
use axum::extract::State;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Builds the HTTP router hosting the socket endpoint. The employee CRUD
/// collaborator mounts its own routes on the same listener; nothing here
/// calls into it.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let path = state.config.socket_path.clone();
    Router::new()
        .route(&path, any(upgrade_handler))
        .with_state(state)
}

/// Serves the socket endpoint until a shutdown signal arrives, then drains
/// gracefully.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_rx.recv().await.ok();
        info!("Socket endpoint shutting down.");
    })
    .await?;
    Ok(())
}

/// Handles an upgrade request on the socket endpoint.
///
/// Admission policy is accept-all: any origin, no authentication, no rate
/// limiting. A request that is not a well-formed upgrade is rejected with
/// the protocol-appropriate status before any session state exists.
async fn upgrade_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            let err = TaskWireError::UpgradeFailure(rejection.body_text());
            warn!("Upgrade from {} refused ({}): {}", addr, err.kind(), err);
            return rejection.into_response();
        }
    };

    upgrade.on_upgrade(move |socket| async move {
        let session_id = state.next_session_id();
        state.stats.increment_total_connections();

        // The session subscribes to shutdown before it becomes visible in
        // the registry, so a signal can never slip between the two.
        let session = SocketSession::new(socket, addr, state.clone(), session_id);
        let info = ClientInfo {
            addr,
            session_id,
            created: Instant::now(),
            last_message_time: Instant::now(),
        };
        state
            .clients
            .insert(session_id, Arc::new(tokio::sync::Mutex::new(info)));

        if let Err(e) = session.run().await {
            warn!(
                "Session {} from {} terminated ({}): {}",
                session_id,
                addr,
                e.kind(),
                e
            );
        }
    })
}
