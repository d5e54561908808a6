//! Park-Miller keystream generator.
//!
//! `next = (current * 48271) mod (2^31 - 1)`, a multiplicative linear
//! congruential generator over the full group of units modulo the Mersenne
//! prime. Because the modulus is not a power of two, the low byte of a key is
//! not determined by the low byte of its predecessor alone.

use crate::core::{KEYSTREAM_MODULUS, KEYSTREAM_MULTIPLIER};

/// Fold a value below 2^32 into `[0, 2^31]` using `2^31 = 1 (mod 2^31 - 1)`.
#[inline]
fn fold(v: u32) -> u32 {
    (v & KEYSTREAM_MODULUS) + (v >> 31)
}

/// Advance the keystream by one step.
///
/// The product is split into 16-bit halves so no intermediate overflows a
/// `u32`. The output lies in `[0, 2^31 - 2]`; zero maps to zero.
pub fn next_key(current: u32) -> u32 {
    let lo = KEYSTREAM_MULTIPLIER * (current & 0xFFFF);
    let hi = KEYSTREAM_MULTIPLIER * (current >> 16);

    // hi * 2^16 = (hi & 0x7FFF) * 2^16 + (hi >> 15) * 2^31
    let mut r = fold(lo);
    r = fold(r + ((hi & 0x7FFF) << 16));
    r = fold(r + (hi >> 15));
    if r >= KEYSTREAM_MODULUS {
        r -= KEYSTREAM_MODULUS;
    }
    r
}

/// Iterator over successive keys starting after `seed`.
#[derive(Debug, Clone)]
pub struct Keystream {
    state: u32,
}

impl Keystream {
    /// Start a keystream from `seed`. The seed itself is not yielded.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl Iterator for Keystream {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.state = next_key(self.state);
        Some(self.state)
    }
}
