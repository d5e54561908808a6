//! Fault injection for links.
//!
//! [`LossyLink`] wraps any [`SerialLink`] and silently discards selected write
//! calls, modelling messages lost on an unreliable wire. Reads pass through.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::{SerialLink, TransportError};

/// Which writes to lose.
#[derive(Debug)]
enum LossPolicy {
    /// Drop the write calls with these zero-based indices.
    Writes(HashSet<usize>),
    /// Drop each write call independently with this probability.
    Random { probability: f64, rng: StdRng },
}

/// A link wrapper that drops outgoing writes.
#[derive(Debug)]
pub struct LossyLink<L> {
    inner: L,
    policy: LossPolicy,
    writes: usize,
    dropped: usize,
}

impl<L: SerialLink> LossyLink<L> {
    /// Drop exactly the write calls numbered in `indices` (zero-based).
    pub fn drop_writes(inner: L, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inner,
            policy: LossPolicy::Writes(indices.into_iter().collect()),
            writes: 0,
            dropped: 0,
        }
    }

    /// Drop each write with `probability`, reproducibly from `seed`.
    pub fn random(inner: L, probability: f64, seed: u64) -> Self {
        Self {
            inner,
            policy: LossPolicy::Random {
                probability: probability.clamp(0.0, 1.0),
                rng: StdRng::seed_from_u64(seed),
            },
            writes: 0,
            dropped: 0,
        }
    }

    /// Number of write calls seen.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of write calls dropped.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Borrow the wrapped link.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Unwrap the link.
    pub fn into_inner(self) -> L {
        self.inner
    }

    fn should_drop(&mut self, index: usize) -> bool {
        match &mut self.policy {
            LossPolicy::Writes(indices) => indices.contains(&index),
            LossPolicy::Random { probability, rng } => rng.gen_bool(*probability),
        }
    }
}

impl<L: SerialLink> SerialLink for LossyLink<L> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let index = self.writes;
        self.writes += 1;
        if self.should_drop(index) {
            self.dropped += 1;
            debug!(index, len = bytes.len(), "dropping write");
            return Ok(());
        }
        self.inner.write_bytes(bytes)
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        self.inner.bytes_available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.inner.read_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory_pair;

    #[test]
    fn test_drop_selected_writes() {
        let (a, mut b) = memory_pair();
        let mut lossy = LossyLink::drop_writes(a, [0, 2]);
        for msg in [b"one".as_slice(), b"two".as_slice(), b"six".as_slice()] {
            lossy.write_bytes(msg).unwrap();
        }
        assert_eq!(lossy.writes(), 3);
        assert_eq!(lossy.dropped(), 2);

        let received: Vec<u8> = std::iter::from_fn(|| b.read_byte()).collect();
        assert_eq!(received, b"two");
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let run = |seed| {
            let mut lossy = LossyLink::random(crate::transport::MemoryLink::detached(), 0.5, seed);
            for _ in 0..100 {
                lossy.write_bytes(b"x").unwrap();
            }
            lossy.inner().sent()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_random_extremes() {
        let mut never = LossyLink::random(crate::transport::MemoryLink::detached(), 0.0, 1);
        let mut always = LossyLink::random(crate::transport::MemoryLink::detached(), 1.0, 1);
        for _ in 0..10 {
            never.write_bytes(b"x").unwrap();
            always.write_bytes(b"x").unwrap();
        }
        assert_eq!(never.dropped(), 0);
        assert_eq!(always.dropped(), 10);
    }
}
