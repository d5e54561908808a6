//! Error types for serial-dh-chat.

use thiserror::Error;

/// Errors raised by a [`SerialLink`](super::SerialLink) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error on the underlying device or socket.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of the link is gone.
    #[error("link closed")]
    Closed,
}

/// Errors in the key-exchange handshake.
///
/// Timeouts and unexpected tags are never errors: they restart the state
/// machine. The only way a handshake fails is a caller-imposed restart bound
/// or a broken link.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The configured restart bound was exceeded.
    #[error("handshake gave up after {restarts} restarts")]
    RetriesExhausted {
        /// Number of restarts performed before giving up.
        restarts: u32,
    },

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Top-level errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Handshake error.
    #[error("handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
