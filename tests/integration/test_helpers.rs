// tests/integration/test_helpers.rs

//! Shared setup for the end-to-end socket tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use taskwire::config::Config;
use taskwire::core::state::ServerState;
use taskwire::server;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running server instance bound to an ephemeral port.
pub struct TestServer {
    pub state: Arc<ServerState>,
    pub addr: SocketAddr,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Serves the socket endpoint on an ephemeral port with default config.
    pub async fn start() -> Self {
        Self::start_with_config(Config::default()).await
    }

    pub async fn start_with_config(config: Config) -> Self {
        let state = ServerState::new(config);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown_rx = state.shutdown_tx.subscribe();
        let handle = tokio::spawn(server::serve(listener, state.clone(), shutdown_rx));
        TestServer {
            state,
            addr,
            handle,
        }
    }

    /// URL of the socket endpoint for WebSocket clients.
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, self.state.config.socket_path)
    }

    /// URL of the socket endpoint for plain HTTP clients.
    pub fn http_url(&self) -> String {
        format!("http://{}{}", self.addr, self.state.config.socket_path)
    }

    /// Number of sessions currently registered.
    pub fn session_count(&self) -> usize {
        self.state.clients.len()
    }

    /// Signals shutdown and waits for the endpoint to drain.
    pub async fn stop(self) {
        let _ = self.state.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Opens a WebSocket connection to the server's socket endpoint.
pub async fn connect(server: &TestServer) -> WsClient {
    let (client, _response) = connect_async(server.ws_url()).await.unwrap();
    client
}

/// Polls until the server has `expected` registered sessions. Registration
/// happens on the upgrade task, so it can trail the client handshake.
pub async fn wait_for_sessions(server: &TestServer, expected: usize) {
    for _ in 0..200 {
        if server.session_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "server never reached {expected} registered session(s), currently {}",
        server.session_count()
    );
}
