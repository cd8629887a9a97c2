// src/connection/session.rs

//! Defines the state associated with a single client session.

/// Lifecycle of a session. Transitions are one-way: a session that has
/// started closing never serves another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Connected,
    Closing,
    Closed,
}

/// Holds the state specific to a single client session.
#[derive(Debug)]
pub struct SessionState {
    pub lifecycle: Lifecycle,
    /// Frames handled so far, in arrival order.
    pub messages_handled: u64,
}

impl SessionState {
    /// Creates a new `SessionState` for a freshly upgraded socket.
    pub(crate) fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Connected,
            messages_handled: 0,
        }
    }
}
