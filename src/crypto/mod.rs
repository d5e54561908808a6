//! Security layer.
//!
//! Implements the cryptographic primitives of the chat:
//! - Overflow-safe modular arithmetic ([`mul_mod`], [`fast_pow_mod`])
//! - Finite-field Diffie-Hellman keys ([`KeyPair`], [`SharedSecret`])
//! - The Park-Miller keystream ([`next_key`])
//! - The per-character XOR cipher ([`CipherState`])
//!
//! # Security
//!
//! The exchange is unauthenticated and works in a 31-bit group. It offers no
//! protection against an active attacker and only token protection against a
//! passive one. Do not reuse it where real confidentiality matters.

mod cipher;
mod keys;
mod keystream;
mod modular;

pub use cipher::{keystream_step, CipherState};
pub use keys::{KeyPair, LowBitSampler, OsEntropy, PrivateKey, PublicKey, SharedSecret};
pub use keystream::{next_key, Keystream};
pub use modular::{fast_pow_mod, mul_mod};
