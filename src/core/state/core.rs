// src/core/state/core.rs

//! The central state shared by the acceptor and every session.

use super::client::ClientMap;
use super::stats::StatsState;
use crate::config::Config;
use crate::core::storage::TodoList;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Holds everything that outlives any single connection. Sessions hold an
/// `Arc` to it; the to-do list is the only member more than one session
/// mutates, and it serializes its own access.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    /// The shared to-do list. Created empty at process start, never persisted.
    pub todo_list: TodoList,
    /// Registry of live sessions, maintained by each session's guard.
    pub clients: ClientMap,
    pub stats: StatsState,
    /// Subscribed to by the endpoint server and by every session; a send
    /// tears all of them down.
    pub shutdown_tx: broadcast::Sender<()>,
    session_id_counter: AtomicU64,
}

impl ServerState {
    pub fn new(config: Config) -> Arc<Self> {
        let (shutdown_tx, _) = broadcast::channel(1);
        Arc::new(Self {
            config,
            todo_list: TodoList::new(),
            clients: DashMap::new(),
            stats: StatsState::new(),
            shutdown_tx,
            session_id_counter: AtomicU64::new(0),
        })
    }

    /// Hands out the next session id. Ids start at 1 and are never reused
    /// within the lifetime of the process.
    pub fn next_session_id(&self) -> u64 {
        self.session_id_counter
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
    }
}
