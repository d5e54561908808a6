//! Runs a handshake state machine over a [`SerialLink`].
//!
//! The driver is the only place where the handshake touches I/O: it turns
//! each state's wait into an [`Event`] and carries out the resulting
//! [`Effect`]s. Timeouts and malformed messages restart the machine and are
//! reported as informational retry notices.
//!
//! # Liveness
//!
//! With `max_restarts = None` the driver retries forever. Against a silent or
//! non-conformant partner it never returns; termination relies on the partner
//! eventually answering with a compatible timeout.

use std::time::Duration;

use tracing::{debug, info};

use super::machine::{Effect, Event, HandshakeMachine};
use super::{InitiatorState, ResponderState, Role};
use crate::core::{HandshakeError, SerialLink, HANDSHAKE_TIMEOUT};
use crate::crypto::PublicKey;

/// Tuning for a handshake run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeOptions {
    /// Quiet-period timeout per wait. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Give up after this many restarts. `None` retries forever.
    pub max_restarts: Option<u32>,
}

impl Default for HandshakeOptions {
    fn default() -> Self {
        Self {
            timeout: Some(HANDSHAKE_TIMEOUT),
            max_restarts: None,
        }
    }
}

/// Result of a completed handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeOutcome {
    /// The partner's public key.
    pub partner_key: PublicKey,
    /// How many times the machine restarted before completing.
    pub restarts: u32,
}

/// Run the machine `M` to completion over `link`.
pub async fn drive<M, L>(
    link: &mut L,
    local: PublicKey,
    options: &HandshakeOptions,
) -> Result<HandshakeOutcome, HandshakeError>
where
    M: HandshakeMachine,
    L: SerialLink,
{
    let mut state = M::initial();
    let mut restarts = 0u32;

    loop {
        if let Some(partner_key) = state.established() {
            info!(partner = %partner_key, restarts, "key exchange complete");
            return Ok(HandshakeOutcome {
                partner_key,
                restarts,
            });
        }

        let event = match state.awaiting() {
            None => Event::Ready,
            Some(n) => {
                if let Some(banner) = state.banner() {
                    info!("{banner}");
                }
                if link.wait_for_bytes(n, options.timeout).await? {
                    let bytes: Vec<u8> = (0..n).map_while(|_| link.read_byte()).collect();
                    Event::Received(bytes)
                } else {
                    Event::TimedOut
                }
            }
        };

        let transition = state.on_event(&event, local);
        debug!(from = ?state, to = ?transition.next, ?event, "handshake transition");

        for effect in transition.effects {
            match effect {
                Effect::DiscardPending => {
                    let dropped = link.discard_pending()?;
                    if dropped > 0 {
                        debug!(dropped, "discarded stale bytes");
                    }
                }
                Effect::Send(message) => link.write_bytes(&message.encode())?,
                Effect::Restart(reason) => {
                    restarts += 1;
                    info!(%reason, restarts, "key exchange will restart");
                    if options.max_restarts.is_some_and(|max| restarts > max) {
                        return Err(HandshakeError::RetriesExhausted { restarts });
                    }
                }
                Effect::Established(_) => {}
            }
        }

        state = transition.next;
    }
}

/// Run the initiator side of the exchange.
pub async fn run_initiator<L: SerialLink>(
    link: &mut L,
    local: PublicKey,
    options: &HandshakeOptions,
) -> Result<HandshakeOutcome, HandshakeError> {
    drive::<InitiatorState, L>(link, local, options).await
}

/// Run the responder side of the exchange.
pub async fn run_responder<L: SerialLink>(
    link: &mut L,
    local: PublicKey,
    options: &HandshakeOptions,
) -> Result<HandshakeOutcome, HandshakeError> {
    drive::<ResponderState, L>(link, local, options).await
}

/// Run whichever side `role` selects.
pub async fn run<L: SerialLink>(
    role: Role,
    link: &mut L,
    local: PublicKey,
    options: &HandshakeOptions,
) -> Result<HandshakeOutcome, HandshakeError> {
    match role {
        Role::Initiator => run_initiator(link, local, options).await,
        Role::Responder => run_responder(link, local, options).await,
    }
}
