//! Protocol constants.
//!
//! Domain parameters and wire tags are shared by both peers and MUST NOT be
//! changed independently on one side.

use std::time::Duration;

// =============================================================================
// DOMAIN PARAMETERS
// =============================================================================

/// Diffie-Hellman prime modulus, the Mersenne prime 2^31 - 1.
pub const PRIME: u32 = 0x7FFF_FFFF;

/// Diffie-Hellman generator, a primitive root modulo [`PRIME`].
pub const GENERATOR: u32 = 16807;

/// Multiplier of the Park-Miller keystream generator.
pub const KEYSTREAM_MULTIPLIER: u32 = 48271;

/// Modulus of the keystream generator (same Mersenne prime as [`PRIME`]).
pub const KEYSTREAM_MODULUS: u32 = 0x7FFF_FFFF;

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Tag byte of a connection request (`REQUEST(key)`).
pub const TAG_REQUEST: u8 = b'C';

/// Tag byte of an acknowledgement (`ACK(key)` and `ACKACK`).
pub const TAG_ACK: u8 = b'A';

/// Encoded public key size (u32, little-endian).
pub const PUBLIC_KEY_SIZE: usize = 4;

/// Size of a keyed message (`REQUEST` or `ACK`): tag + key.
pub const KEYED_MESSAGE_SIZE: usize = 1 + PUBLIC_KEY_SIZE;

/// Size of the bare `ACKACK` message.
pub const ACKACK_SIZE: usize = 1;

// =============================================================================
// TIMING
// =============================================================================

/// Quiet-period timeout for each handshake wait.
///
/// Both peers must use the same (or a compatible) value for the handshake to
/// converge under loss.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Polling interval while waiting for bytes on a link.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);
