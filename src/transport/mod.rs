//! Reference implementations of the byte link.
//!
//! The protocol only depends on the [`SerialLink`](crate::core::SerialLink)
//! trait. This module provides:
//!
//! - [`MemoryLink`]: an in-process duplex pair with a write trace
//! - [`LossyLink`]: a wrapper that drops selected or random writes
//! - [`UdpLink`]: a connected UDP socket used as an unreliable byte pipe
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Chat session (cipher loop)       │
//! ├─────────────────────────────────────────┤
//! │          Handshake driver               │
//! ├─────────────────────────────────────────┤
//! │          SerialLink trait               │  ← This module implements it
//! ├─────────────────────────────────────────┤
//! │    memory / lossy wrapper / UDP         │
//! └─────────────────────────────────────────┘
//! ```

mod lossy;
mod memory;
mod udp;

pub use lossy::LossyLink;
pub use memory::{memory_pair, MemoryLink};
pub use udp::{UdpLink, DEFAULT_RECV_BUFFER_SIZE};
