//! Initiator ("client") state machine.
//!
//! ```text
//!            ┌──────────── timeout / wrong tag ────────────┐
//!            ▼                                             │
//!   START ──(discard, send REQUEST)──► WAIT_ACK ──(ACK)──► DONE
//!                                                   send ACKACK
//! ```
//!
//! A lost REQUEST and a lost ACK look the same from here and are both
//! handled by a full restart. There is no failure state.

use super::machine::{Effect, Event, HandshakeMachine, RestartReason, Transition};
use super::message::{decode_ack, Message, MessageError};
use crate::core::KEYED_MESSAGE_SIZE;
use crate::crypto::PublicKey;

/// Initiator handshake state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiatorState {
    /// About to (re)transmit the request.
    Start,
    /// Request sent, waiting for `ACK(key)`.
    WaitAck,
    /// Exchange complete.
    Done {
        /// The responder's public key.
        partner: PublicKey,
    },
}

impl HandshakeMachine for InitiatorState {
    fn initial() -> Self {
        InitiatorState::Start
    }

    fn awaiting(&self) -> Option<usize> {
        match self {
            InitiatorState::WaitAck => Some(KEYED_MESSAGE_SIZE),
            InitiatorState::Start | InitiatorState::Done { .. } => None,
        }
    }

    fn on_event(self, event: &Event, local: PublicKey) -> Transition<Self> {
        match self {
            InitiatorState::Start => Transition::with(
                InitiatorState::WaitAck,
                [Effect::DiscardPending, Effect::Send(Message::Request(local))],
            ),
            InitiatorState::WaitAck => match event {
                Event::Received(bytes) => match decode_ack(bytes) {
                    Ok(partner) => Transition::with(
                        InitiatorState::Done { partner },
                        [Effect::Send(Message::AckAck), Effect::Established(partner)],
                    ),
                    Err(MessageError::UnexpectedTag(tag)) => restart(RestartReason::Malformed(Some(tag))),
                    Err(MessageError::Truncated { .. }) => restart(RestartReason::Malformed(None)),
                },
                Event::TimedOut | Event::Ready => restart(RestartReason::Timeout),
            },
            done @ InitiatorState::Done { .. } => Transition::to(done),
        }
    }

    fn established(&self) -> Option<PublicKey> {
        match self {
            InitiatorState::Done { partner } => Some(*partner),
            _ => None,
        }
    }
}

fn restart(reason: RestartReason) -> Transition<InitiatorState> {
    Transition::with(InitiatorState::Start, [Effect::Restart(reason)])
}
