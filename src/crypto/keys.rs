//! Key material for the finite-field Diffie-Hellman exchange.
//!
//! Private keys and shared secrets are zeroized on drop and never printed.

use std::fmt;
use std::thread;
use std::time::Duration;

use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::modular::fast_pow_mod;
use crate::core::{EntropySource, GENERATOR, PRIME, PUBLIC_KEY_SIZE};

/// A 32-bit private exponent. Never transmitted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(u32);

impl PrivateKey {
    /// Wrap raw key material.
    pub fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// Draw a fresh private key from an entropy source.
    pub fn generate<E: EntropySource>(mut entropy: E) -> Self {
        Self(entropy.next_u32())
    }

    /// Expose the raw exponent.
    ///
    /// # Security
    /// Handle with care - this exposes sensitive key material.
    pub fn expose(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A public key, `GENERATOR ^ private mod PRIME`. Safe to transmit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey(u32);

impl PublicKey {
    /// Wrap a raw value, e.g. one received from the partner.
    ///
    /// No range check is made: a partner may send anything, and
    /// [`fast_pow_mod`] reduces the base before use.
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// The raw value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Decode from the 4-byte little-endian wire form.
    pub fn from_le_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Encode to the 4-byte little-endian wire form.
    pub fn to_le_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The per-session Diffie-Hellman secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(u32);

impl SharedSecret {
    /// Expose the raw secret.
    pub fn expose(&self) -> u32 {
        self.0
    }

    /// The 8-bit seed of both cipher key schedules (`secret mod 256`).
    pub fn cipher_seed(&self) -> u8 {
        (self.0 % 256) as u8
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// A private key together with its public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a keypair from an entropy source.
    pub fn generate<E: EntropySource>(entropy: E) -> Self {
        Self::from_private(PrivateKey::generate(entropy))
    }

    /// Derive the public half for an existing private key.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = PublicKey(fast_pow_mod(GENERATOR, private.expose(), PRIME));
        Self { private, public }
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// The private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Compute `partner ^ private mod PRIME`.
    pub fn shared_secret(&self, partner: PublicKey) -> SharedSecret {
        SharedSecret(fast_pow_mod(partner.as_u32(), self.private.expose(), PRIME))
    }
}

/// Entropy from the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }
}

/// Builds 32-bit numbers from the least significant bit of 32 successive
/// samples of a noisy reading (e.g. a floating analog input).
///
/// Bits are shifted in most-significant first. An optional settle delay
/// between samples lets the reading fluctuate.
///
/// # Security
/// Single-bit samples of a physical input are strongly correlated and biased.
/// Keys drawn this way are NOT cryptographically sound; prefer [`OsEntropy`].
pub struct LowBitSampler<F> {
    sample: F,
    settle: Duration,
}

impl<F: FnMut() -> u16> LowBitSampler<F> {
    /// Create a sampler with no settle delay.
    pub fn new(sample: F) -> Self {
        Self {
            sample,
            settle: Duration::ZERO,
        }
    }

    /// Set the delay between successive samples.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

impl<F: FnMut() -> u16> EntropySource for LowBitSampler<F> {
    fn next_u32(&mut self) -> u32 {
        let mut number = 0u32;
        for _ in 0..32 {
            number = (number << 1) | u32::from((self.sample)() & 1);
            if !self.settle.is_zero() {
                thread::sleep(self.settle);
            }
        }
        number
    }
}

impl<F> fmt::Debug for LowBitSampler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LowBitSampler")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32);

    impl EntropySource for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_public_key_in_range() {
        let kp = KeyPair::generate(OsEntropy);
        assert!(kp.public_key().as_u32() < PRIME);
        assert!(kp.public_key().as_u32() > 0);
    }

    #[test]
    fn test_public_key_known_value() {
        let kp = KeyPair::generate(Fixed(2));
        assert_eq!(kp.public_key().as_u32(), 282_475_249);
    }

    #[test]
    fn test_shared_secret_agreement() {
        let alice = KeyPair::generate(Fixed(2_229_654_386));
        let bob = KeyPair::generate(Fixed(3_039_853_402));

        let from_alice = alice.shared_secret(bob.public_key());
        let from_bob = bob.shared_secret(alice.public_key());
        assert_eq!(from_alice, from_bob);
        assert_eq!(from_alice.cipher_seed(), (from_bob.expose() % 256) as u8);
    }

    #[test]
    fn test_public_key_wire_roundtrip() {
        let key = PublicKey::from_u32(0x1234_5678);
        assert_eq!(key.to_le_bytes(), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(PublicKey::from_le_bytes([0x78, 0x56, 0x34, 0x12]), key);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let kp = KeyPair::generate(Fixed(777));
        assert_eq!(format!("{:?}", kp.private_key()), "PrivateKey([REDACTED])");
        assert!(format!("{:?}", kp).contains("REDACTED"));
        let secret = kp.shared_secret(kp.public_key());
        assert_eq!(format!("{:?}", secret), "SharedSecret([REDACTED])");
    }

    #[test]
    fn test_low_bit_sampler_msb_first() {
        // Alternating readings 1, 2, 3, 4, ... -> low bits 1, 0, 1, 0, ...
        let mut reading = 0u16;
        let mut sampler = LowBitSampler::new(move || {
            reading += 1;
            reading
        });
        assert_eq!(sampler.next_u32(), 0xAAAA_AAAA);
    }

    #[test]
    fn test_low_bit_sampler_constant_input_is_degenerate() {
        let mut sampler = LowBitSampler::new(|| 512);
        assert_eq!(sampler.next_u32(), 0);
    }
}
