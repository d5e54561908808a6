//! Collaborator traits.
//!
//! The protocol core never touches hardware directly. A byte link and an
//! entropy source are injected through these traits.

use std::time::Duration;

use tokio::time::Instant;

use super::constants::POLL_INTERVAL;
use super::error::TransportError;

/// A byte-oriented, best-effort link to the partner.
///
/// Writes carry no delivery guarantee: bytes may be lost, delayed or
/// duplicated. Reads only consume bytes that are already buffered.
///
/// # Example
///
/// ```ignore
/// async fn first_byte<L: SerialLink>(link: &mut L) -> Result<Option<u8>, TransportError> {
///     if link.wait_for_bytes(1, Some(Duration::from_millis(1000))).await? {
///         Ok(link.read_byte())
///     } else {
///         Ok(None)
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait SerialLink {
    /// Send bytes to the partner. Best effort, no acknowledgement.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Number of bytes currently buffered for reading.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Consume one buffered byte, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;

    /// Wait until at least `n` bytes are buffered or `timeout` elapses.
    ///
    /// `None` waits forever. Returns whether `n` bytes became available.
    /// The default implementation polls [`bytes_available`](Self::bytes_available)
    /// every [`POLL_INTERVAL`] and yields to the runtime in between.
    async fn wait_for_bytes(
        &mut self,
        n: usize,
        timeout: Option<Duration>,
    ) -> Result<bool, TransportError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if self.bytes_available()? >= n {
                return Ok(true);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Drop every byte currently buffered. Returns how many were dropped.
    fn discard_pending(&mut self) -> Result<usize, TransportError> {
        let mut dropped = 0;
        while self.bytes_available()? > 0 {
            if self.read_byte().is_none() {
                break;
            }
            dropped += 1;
        }
        Ok(dropped)
    }
}

/// Source of raw bits for private-key generation.
///
/// Quality is the caller's responsibility; see
/// [`LowBitSampler`](crate::crypto::LowBitSampler) for a deliberately weak
/// example.
pub trait EntropySource {
    /// Produce 32 bits of key material.
    fn next_u32(&mut self) -> u32;
}

impl<T: EntropySource + ?Sized> EntropySource for &mut T {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
