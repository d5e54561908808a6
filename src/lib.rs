//! # serial-dh-chat
//!
//! Encrypted two-party chat over a lossy byte link.
//!
//! Two peers that share nothing but an unreliable serial-style wire agree on a
//! secret with a Diffie-Hellman exchange over the prime field 2^31 − 1, then
//! encrypt every byte with an XOR keystream driven by a Park-Miller generator.
//!
//! - **Handshake**: request / ack / ack-ack state machines that restart on
//!   timeout, so either side may start first or lose a message
//! - **Keystream**: one rolling 8-bit key per direction
//! - **Transport-agnostic**: anything implementing [`SerialLink`]
//!
//! ## Security
//!
//! This is a teaching protocol. The group is tiny, the cipher key is 8 bits
//! and peers are not authenticated. Do not use it to protect real secrets.
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types and collaborator traits
//! - [`crypto`]: Modular arithmetic, keys, keystream and cipher state
//! - [`handshake`]: Wire messages, state machines and the I/O driver
//! - [`transport`]: In-memory, lossy and UDP links
//! - [`session`]: Configuration, peers and the exchange loop
//!
//! ## Example Usage
//!
//! ```rust
//! use serial_dh_chat::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ChatError> {
//! let (wire_a, wire_b) = memory_pair();
//!
//! let alice = Peer::new(
//!     SessionConfigBuilder::new().role(Role::Initiator).build(),
//!     OsEntropy,
//! );
//! let bob = Peer::new(SessionConfig::default(), OsEntropy);
//!
//! let (alice, bob) = tokio::join!(alice.establish(wire_a), bob.establish(wire_b));
//! let (mut alice, mut bob) = (alice?, bob?);
//!
//! alice.send_byte(b'!')?;
//! assert_eq!(bob.poll_byte()?, Some(b'!'));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod crypto;
pub mod handshake;
pub mod session;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::crypto::{CipherState, KeyPair, LowBitSampler, OsEntropy, PublicKey};
    pub use crate::handshake::{HandshakeOptions, HandshakeOutcome, Role};
    pub use crate::session::{
        ChatSession, Peer, SessionConfig, SessionConfigBuilder, SessionStats,
    };
    pub use crate::transport::{memory_pair, LossyLink, MemoryLink, UdpLink};
}

// Re-export commonly used items at crate root
pub use crate::core::{ChatError, EntropySource, HandshakeError, SerialLink, TransportError};
pub use handshake::Role;
pub use session::{ChatSession, Peer, SessionConfig, SessionConfigBuilder};
