//! The encrypted exchange loop.
//!
//! After the handshake, each peer runs a [`ChatSession`]. Every iteration
//! services both directions at most once with non-blocking polls, so a
//! steady stream in one direction never starves the other.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::core::{SerialLink, TransportError, POLL_INTERVAL};
use crate::crypto::{CipherState, PublicKey};

/// What one [`ChatSession::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Ciphertext byte transmitted, if any.
    pub sent: Option<u8>,
    /// Plaintext byte recovered from the link, if any.
    pub received: Option<u8>,
}

impl StepOutcome {
    /// True if neither direction had work.
    pub fn is_idle(&self) -> bool {
        self.sent.is_none() && self.received.is_none()
    }
}

/// Byte counters for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    /// Plaintext bytes encrypted and sent.
    pub bytes_sent: u64,
    /// Ciphertext bytes received and decrypted.
    pub bytes_received: u64,
}

/// An established, encrypted chat over a link.
///
/// Owns the link exclusively: the handshake has finished with it.
#[derive(Debug)]
pub struct ChatSession<L> {
    link: L,
    cipher: CipherState,
    partner_key: PublicKey,
    poll_interval: Duration,
    stats: SessionStats,
}

impl<L: SerialLink> ChatSession<L> {
    /// Wrap a link whose handshake produced `cipher`.
    pub fn new(link: L, cipher: CipherState, partner_key: PublicKey) -> Self {
        Self {
            link,
            cipher,
            partner_key,
            poll_interval: POLL_INTERVAL,
            stats: SessionStats::default(),
        }
    }

    /// Set the idle sleep used by [`run`](Self::run).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The partner's public key.
    pub fn partner_key(&self) -> PublicKey {
        self.partner_key
    }

    /// Current cipher state.
    pub fn cipher(&self) -> &CipherState {
        &self.cipher
    }

    /// Counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Borrow the link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Give the link back.
    pub fn into_link(self) -> L {
        self.link
    }

    /// Encrypt and transmit one plaintext byte.
    pub fn send_byte(&mut self, plaintext: u8) -> Result<u8, TransportError> {
        let ciphertext = self.cipher.encrypt(plaintext);
        self.link.write_bytes(&[ciphertext])?;
        self.stats.bytes_sent += 1;
        Ok(ciphertext)
    }

    /// Read and decrypt one byte if the link has any buffered.
    pub fn poll_byte(&mut self) -> Result<Option<u8>, TransportError> {
        if self.link.bytes_available()? == 0 {
            return Ok(None);
        }
        Ok(self.link.read_byte().map(|ciphertext| {
            self.stats.bytes_received += 1;
            self.cipher.decrypt(ciphertext)
        }))
    }

    /// Service each direction once without blocking.
    ///
    /// `outgoing` is the next plaintext byte to send, if the caller has one.
    pub fn step(&mut self, outgoing: Option<u8>) -> Result<StepOutcome, TransportError> {
        let sent = outgoing.map(|b| self.send_byte(b)).transpose()?;
        let received = self.poll_byte()?;
        Ok(StepOutcome { sent, received })
    }

    /// Run until the plaintext input closes or nobody reads the output.
    ///
    /// Plaintext arrives on `input` and decrypted bytes leave on `output`.
    /// When `input` closes, ciphertext already buffered on the link is still
    /// delivered before returning.
    pub async fn run(
        &mut self,
        mut input: mpsc::Receiver<u8>,
        output: mpsc::UnboundedSender<u8>,
    ) -> Result<SessionStats, TransportError> {
        let mut input_open = true;
        info!(partner = %self.partner_key, "data exchange started");

        loop {
            let outgoing = if input_open {
                match input.try_recv() {
                    Ok(byte) => Some(byte),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => {
                        debug!("plaintext input closed");
                        input_open = false;
                        None
                    }
                }
            } else {
                None
            };

            let outcome = self.step(outgoing)?;
            if let Some(plaintext) = outcome.received {
                if output.send(plaintext).is_err() {
                    debug!("plaintext output dropped");
                    break;
                }
            }

            if outcome.is_idle() {
                if !input_open {
                    break;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        info!(
            sent = self.stats.bytes_sent,
            received = self.stats.bytes_received,
            "data exchange finished"
        );
        Ok(self.stats)
    }
}
