//! Public-key exchange over a lossy byte link.
//!
//! Two role-specific state machines share a three-message vocabulary:
//!
//! ```text
//!   Initiator                          Responder
//!   START ── REQUEST('C', key) ──────► LISTEN → WAIT_KEY
//!   WAIT_ACK ◄────── ACK('A', key) ─── WAIT_ACKACK
//!   DONE ──── ACKACK('A') ───────────► DONE
//! ```
//!
//! - [`InitiatorState`] and [`ResponderState`]: pure transition functions
//! - [`Message`]: wire encoding
//! - [`drive`], [`run`]: execute a machine over a [`SerialLink`](crate::core::SerialLink)
//!
//! The exchange is unauthenticated. Anyone who can inject bytes on the link
//! can sit in the middle.

mod driver;
mod initiator;
mod machine;
mod message;
mod responder;

use std::fmt;
use std::str::FromStr;

pub use driver::{drive, run, run_initiator, run_responder, HandshakeOptions, HandshakeOutcome};
pub use initiator::InitiatorState;
pub use machine::{Effect, Event, HandshakeMachine, RestartReason, Transition};
pub use message::{decode_ack, decode_key, Message, MessageError};
pub use responder::ResponderState;

/// Role in the handshake, assigned externally before it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Initiator (client): sends requests until acknowledged.
    Initiator,
    /// Responder (server): listens for requests.
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => f.write_str("initiator"),
            Role::Responder => f.write_str("responder"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initiator" | "client" => Ok(Role::Initiator),
            "responder" | "server" => Ok(Role::Responder),
            other => Err(format!("unknown role {other:?}, expected initiator or responder")),
        }
    }
}
