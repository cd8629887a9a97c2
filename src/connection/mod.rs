// src/connection/mod.rs

//! Manages the lifecycle of a single socket session, from the accepted
//! upgrade through the read loop to teardown.

// Declare the private sub-modules of the `connection` module.
mod guard;
mod handler;
mod session;

// Publicly re-export the primary types from the sub-modules.
pub use guard::ConnectionGuard;
pub use handler::SocketSession;
pub use session::{Lifecycle, SessionState};
