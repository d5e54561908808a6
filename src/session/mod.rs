//! Session layer.
//!
//! Ties the pieces together for one side of a conversation:
//!
//! ```text
//! Peer::new ──► Peer::establish ──► ChatSession::run
//!  (keys)        (handshake,         (encrypted byte
//!                 shared secret)      exchange)
//! ```

mod chat;
mod config;
mod peer;

pub use chat::{ChatSession, SessionStats, StepOutcome};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use peer::Peer;

pub use crate::handshake::Role;
