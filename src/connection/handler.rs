// src/connection/handler.rs

//! Defines the `SocketSession` which manages the full lifecycle of a client
//! connection.

use super::guard::ConnectionGuard;
use super::session::{Lifecycle, SessionState};
use crate::core::state::ServerState;
use crate::core::{Command, TaskWireError};
use axum::extract::ws::{Message, WebSocket};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::error::Elapsed;
use tracing::{debug, info};

/// The next step for the session's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of one upgraded socket. The session is the
/// exclusive owner of the socket; no other task ever touches it.
pub struct SocketSession {
    socket: WebSocket,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    session: SessionState,
}

impl SocketSession {
    /// Creates a new `SocketSession` for an accepted upgrade.
    pub fn new(
        socket: WebSocket,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
    ) -> Self {
        let shutdown_rx = state.shutdown_tx.subscribe();
        Self {
            socket,
            addr,
            state,
            session_id,
            shutdown_rx,
            session: SessionState::new(),
        }
    }

    /// The main event loop for the connection, handling incoming frames and
    /// shutdown signals. Returns after teardown has run; an `Err` carries
    /// the failure that ended the session early. Errors here are terminal
    /// for this session only and are never escalated past the caller.
    pub async fn run(mut self) -> Result<(), TaskWireError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        info!(
            "Client connected: {} (session {})",
            self.addr, self.session_id
        );

        let idle_timeout = self.state.config.idle_timeout;

        let result = loop {
            let polled = tokio::select! {
                // Prioritize the shutdown signal over pending frames.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Session {} received shutdown signal.", self.session_id);
                    let _ = self.socket.send(Message::Close(None)).await;
                    break Ok(());
                }
                polled = next_frame(&mut self.socket, idle_timeout) => polled,
            };

            match polled {
                Err(_elapsed) => {
                    info!(
                        "Closing idle session {} for {} after {:?} without traffic.",
                        self.session_id,
                        self.addr,
                        idle_timeout.unwrap_or(Duration::ZERO)
                    );
                    let _ = self.socket.send(Message::Close(None)).await;
                    break Ok(());
                }
                Ok(Some(Ok(frame))) => match self.process_frame(frame).await {
                    Ok(NextAction::Continue) => {}
                    Ok(NextAction::ExitLoop) => break Ok(()),
                    Err(e) => break Err(e),
                },
                Ok(Some(Err(e))) => {
                    debug!("Read error on session {}: {}", self.session_id, e);
                    break Err(TaskWireError::ReadFailure(e.to_string()));
                }
                Ok(None) => {
                    debug!("Connection from {} closed by peer.", self.addr);
                    break Ok(());
                }
            }
        };

        self.session.lifecycle = Lifecycle::Closing;
        self.teardown();
        result
    }

    /// Handles a single inbound frame. Text frames are logged, parsed, and
    /// applied to the shared list, then echoed back verbatim; the echo is
    /// the entire per-frame response contract. Binary frames are echoed
    /// unchanged without command parsing.
    async fn process_frame(&mut self, frame: Message) -> Result<NextAction, TaskWireError> {
        match frame {
            Message::Text(text) => {
                debug!(
                    "Session {}: received message: {}",
                    self.session_id,
                    text.as_str()
                );

                let command = Command::parse(text.as_str());
                let removed = command.apply(&self.state.todo_list);
                if removed > 0 {
                    debug!(
                        "Session {}: '{}' removed {} item(s), {} remaining.",
                        self.session_id,
                        command.payload,
                        removed,
                        self.state.todo_list.len()
                    );
                }

                self.note_message_handled().await;
                self.socket
                    .send(Message::Text(text))
                    .await
                    .map_err(|e| TaskWireError::WriteFailure(e.to_string()))?;
                Ok(NextAction::Continue)
            }
            Message::Binary(payload) => {
                self.note_message_handled().await;
                self.socket
                    .send(Message::Binary(payload))
                    .await
                    .map_err(|e| TaskWireError::WriteFailure(e.to_string()))?;
                Ok(NextAction::Continue)
            }
            Message::Close(_) => Ok(NextAction::ExitLoop),
            // Ping/pong keepalives are answered by the protocol layer.
            Message::Ping(_) | Message::Pong(_) => Ok(NextAction::Continue),
        }
    }

    /// Records one handled frame in session and server bookkeeping.
    async fn note_message_handled(&mut self) {
        self.session.messages_handled += 1;
        self.state.stats.increment_total_messages();
        if let Some(entry) = self.state.clients.get(&self.session_id) {
            entry.value().lock().await.last_message_time = Instant::now();
        }
    }

    /// Closing -> Closed. Runs exactly once per session regardless of which
    /// path ended the loop; the registry entry itself is removed by
    /// `ConnectionGuard` even if the loop body panicked.
    fn teardown(&mut self) {
        self.session.lifecycle = Lifecycle::Closed;
        info!(
            "Client disconnected: {} (session {}, {} message(s) handled)",
            self.addr, self.session_id, self.session.messages_handled
        );
    }
}

/// Waits for the next inbound frame, bounded by the idle timeout when one is
/// configured.
async fn next_frame(
    socket: &mut WebSocket,
    idle_timeout: Option<Duration>,
) -> Result<Option<Result<Message, axum::Error>>, Elapsed> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, socket.recv()).await,
        None => Ok(socket.recv().await),
    }
}
