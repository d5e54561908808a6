//! Vocabulary shared by the role-specific state machines.
//!
//! A machine is a plain value. Feeding it an [`Event`] yields a
//! [`Transition`]: the next state plus the [`Effect`]s the driver must carry
//! out. No I/O happens inside a transition, so the machines can be tested
//! without a link.

use std::fmt;

use super::message::Message;
use crate::crypto::PublicKey;

/// Input to a state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The state waits for nothing; act immediately.
    Ready,
    /// The requested number of bytes arrived.
    Received(Vec<u8>),
    /// The wait elapsed before enough bytes arrived.
    TimedOut,
}

/// Why a machine fell back to its initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// No (or not enough) bytes within the timeout.
    Timeout,
    /// A message arrived with the wrong tag or was truncated.
    Malformed(Option<u8>),
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::Timeout => f.write_str("timeout"),
            RestartReason::Malformed(Some(tag)) => write!(f, "unexpected tag {tag:#04x}"),
            RestartReason::Malformed(None) => f.write_str("truncated message"),
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Drop every byte currently buffered on the link.
    DiscardPending,
    /// Transmit a message.
    Send(Message),
    /// The machine restarted; surface a retry notice.
    Restart(RestartReason),
    /// The exchange completed with the partner's public key.
    Established(PublicKey),
}

/// Result of feeding one event to a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    /// State after the event.
    pub next: S,
    /// Effects to carry out, in order.
    pub effects: Vec<Effect>,
}

impl<S> Transition<S> {
    /// Move to `next` with no effects.
    pub fn to(next: S) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    /// Move to `next` with the given effects.
    pub fn with(next: S, effects: impl Into<Vec<Effect>>) -> Self {
        Self {
            next,
            effects: effects.into(),
        }
    }
}

/// A role-specific handshake state machine.
pub trait HandshakeMachine: Copy + fmt::Debug + Sized {
    /// The state every exchange starts in.
    fn initial() -> Self;

    /// Bytes this state waits for, or `None` if it acts on [`Event::Ready`].
    fn awaiting(&self) -> Option<usize>;

    /// Pure transition function. `local` is our own public key.
    fn on_event(self, event: &Event, local: PublicKey) -> Transition<Self>;

    /// The partner's key once the terminal state is reached.
    fn established(&self) -> Option<PublicKey>;

    /// Operator notice logged before every wait in this state.
    fn banner(&self) -> Option<&'static str> {
        None
    }
}
