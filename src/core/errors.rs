// src/core/errors.rs

//! Defines the primary error type for the entire application.

use thiserror::Error;

/// The main error enum, representing the ways a socket session can fail.
/// All variants are local to a single session; none is ever escalated to the
/// acceptor or to other sessions.
#[derive(Error, Debug)]
pub enum TaskWireError {
    /// The HTTP-to-WebSocket handshake could not be completed. Reported to
    /// the requesting client; no session exists for it.
    #[error("upgrade handshake failed: {0}")]
    UpgradeFailure(String),

    /// The socket became unreadable. Terminal for the owning session.
    #[error("socket read failed: {0}")]
    ReadFailure(String),

    /// The socket became unwritable. Terminal for the owning session.
    #[error("socket write failed: {0}")]
    WriteFailure(String),
}

impl TaskWireError {
    /// A short stable label for the failure kind, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskWireError::UpgradeFailure(_) => "upgrade",
            TaskWireError::ReadFailure(_) => "read",
            TaskWireError::WriteFailure(_) => "write",
        }
    }
}
