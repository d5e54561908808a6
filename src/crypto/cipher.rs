//! Per-character XOR stream cipher.
//!
//! Each direction keeps its own 8-bit rolling key. Both start at the shared
//! secret mod 256 and advance exactly once per byte processed in that
//! direction. There is no resynchronisation: if a byte is lost on the wire,
//! the receiver's schedule runs one step behind the sender's for the rest of
//! the session and every later byte decrypts to garbage.

use super::keys::SharedSecret;
use super::keystream::next_key;

/// XOR `byte` with `key` and return it together with the next key.
pub fn keystream_step(key: u8, byte: u8) -> (u8, u8) {
    let out = byte ^ key;
    let next = (next_key(u32::from(key)) % 256) as u8;
    (out, next)
}

/// Rolling key state for both directions of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherState {
    encrypt_key: u8,
    decrypt_key: u8,
}

impl CipherState {
    /// Seed both directions from the shared secret.
    pub fn from_secret(secret: &SharedSecret) -> Self {
        Self::from_seed(secret.cipher_seed())
    }

    /// Seed both directions with the same 8-bit key.
    pub fn from_seed(seed: u8) -> Self {
        Self {
            encrypt_key: seed,
            decrypt_key: seed,
        }
    }

    /// Encrypt one outgoing byte and advance the send schedule.
    pub fn encrypt(&mut self, plaintext: u8) -> u8 {
        let (ciphertext, next) = keystream_step(self.encrypt_key, plaintext);
        self.encrypt_key = next;
        ciphertext
    }

    /// Decrypt one incoming byte and advance the receive schedule.
    pub fn decrypt(&mut self, ciphertext: u8) -> u8 {
        let (plaintext, next) = keystream_step(self.decrypt_key, ciphertext);
        self.decrypt_key = next;
        plaintext
    }

    /// Current send key.
    pub fn encrypt_key(&self) -> u8 {
        self.encrypt_key
    }

    /// Current receive key.
    pub fn decrypt_key(&self) -> u8 {
        self.decrypt_key
    }
}
