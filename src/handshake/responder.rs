//! Responder ("server") state machine.
//!
//! ```text
//!   LISTEN ──'C'──► WAIT_KEY ──key/send ACK──► WAIT_ACKACK ──'A'──► DONE
//!     ▲                ▲                           │
//!     │                └────────── 'C' ────────────┘
//!     └──── timeout / unexpected tag (any state) ──┘
//! ```
//!
//! A duplicate `'C'` in WAIT_ACKACK means the initiator retransmitted its
//! request because our ACK (or its ACKACK) was lost. The machine goes back to
//! WAIT_KEY, consumes the repeated key and sends the ACK again, without
//! passing through LISTEN.

use super::machine::{Effect, Event, HandshakeMachine, RestartReason, Transition};
use super::message::{decode_key, Message};
use crate::core::{ACKACK_SIZE, PUBLIC_KEY_SIZE, TAG_ACK, TAG_REQUEST};
use crate::crypto::PublicKey;

/// Responder handshake state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderState {
    /// Waiting for the `'C'` tag of a request.
    Listen,
    /// Tag seen, waiting for the initiator's 4-byte key.
    WaitKey,
    /// ACK sent, waiting for the ACKACK.
    WaitAckAck {
        /// The initiator's public key as last received.
        partner: PublicKey,
    },
    /// Exchange complete.
    Done {
        /// The initiator's public key.
        partner: PublicKey,
    },
}

impl HandshakeMachine for ResponderState {
    fn initial() -> Self {
        ResponderState::Listen
    }

    fn awaiting(&self) -> Option<usize> {
        match self {
            ResponderState::Listen | ResponderState::WaitAckAck { .. } => Some(ACKACK_SIZE),
            ResponderState::WaitKey => Some(PUBLIC_KEY_SIZE),
            ResponderState::Done { .. } => None,
        }
    }

    fn on_event(self, event: &Event, local: PublicKey) -> Transition<Self> {
        if let ResponderState::Done { .. } = self {
            return Transition::to(self);
        }
        let bytes = match event {
            Event::Received(bytes) => bytes.as_slice(),
            Event::TimedOut => return restart(RestartReason::Timeout),
            Event::Ready => return Transition::to(self),
        };

        match self {
            ResponderState::Listen => match bytes.first() {
                Some(&TAG_REQUEST) => Transition::to(ResponderState::WaitKey),
                Some(&other) => restart(RestartReason::Malformed(Some(other))),
                None => Transition::to(ResponderState::Listen),
            },
            ResponderState::WaitKey => match decode_key(bytes) {
                // One ACK per key received, including re-entries after a
                // duplicate request.
                Ok(partner) => Transition::with(
                    ResponderState::WaitAckAck { partner },
                    [Effect::Send(Message::Ack(local))],
                ),
                Err(_) => restart(RestartReason::Malformed(None)),
            },
            ResponderState::WaitAckAck { partner } => match bytes.first() {
                Some(&TAG_ACK) => Transition::with(
                    ResponderState::Done { partner },
                    [Effect::Established(partner)],
                ),
                Some(&TAG_REQUEST) => Transition::to(ResponderState::WaitKey),
                Some(&other) => restart(RestartReason::Malformed(Some(other))),
                None => Transition::to(self),
            },
            done @ ResponderState::Done { .. } => Transition::to(done),
        }
    }

    fn established(&self) -> Option<PublicKey> {
        match self {
            ResponderState::Done { partner } => Some(*partner),
            _ => None,
        }
    }

    fn banner(&self) -> Option<&'static str> {
        match self {
            ResponderState::Listen => Some("waiting for a connection request"),
            _ => None,
        }
    }
}

/// Back to LISTEN. An unexpected tag takes the same path as a timeout.
fn restart(reason: RestartReason) -> Transition<ResponderState> {
    Transition::with(ResponderState::Listen, [Effect::Restart(reason)])
}
