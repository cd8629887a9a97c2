// src/core/state/client.rs

//! Contains state definitions related to client connections.

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub type ClientMap = DashMap<u64, Arc<Mutex<ClientInfo>>>;

/// Bookkeeping for one live socket session, keyed by session id in
/// `ServerState::clients`. The entry exists for exactly as long as the
/// session's read-loop task.
#[derive(Debug)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub session_id: u64,
    pub created: Instant,
    pub last_message_time: Instant,
}
