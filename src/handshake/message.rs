//! Handshake wire messages.
//!
//! ```text
//! REQUEST(key)  'C' | key[0] key[1] key[2] key[3]     5 bytes
//! ACK(key)      'A' | key[0] key[1] key[2] key[3]     5 bytes
//! ACKACK        'A'                                   1 byte
//! ```
//!
//! Keys are u32 little-endian. `ACK` and `ACKACK` share a tag, so decoding is
//! always done in the context of the state that expects the bytes.

use thiserror::Error;

use crate::core::{ACKACK_SIZE, KEYED_MESSAGE_SIZE, PUBLIC_KEY_SIZE, TAG_ACK, TAG_REQUEST};
use crate::crypto::PublicKey;

/// Errors decoding a handshake message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Fewer bytes than the message needs.
    #[error("truncated message: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// First byte is not the expected tag.
    #[error("unexpected tag byte {0:#04x}")]
    UnexpectedTag(u8),
}

/// A handshake message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Connection request carrying the initiator's public key.
    Request(PublicKey),
    /// Acknowledgement carrying the responder's public key.
    Ack(PublicKey),
    /// Acknowledgement of the acknowledgement.
    AckAck,
}

impl Message {
    /// Encoded size in bytes.
    pub fn wire_len(&self) -> usize {
        match self {
            Message::Request(_) | Message::Ack(_) => KEYED_MESSAGE_SIZE,
            Message::AckAck => ACKACK_SIZE,
        }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        match self {
            Message::Request(key) => {
                buf.push(TAG_REQUEST);
                buf.extend_from_slice(&key.to_le_bytes());
            }
            Message::Ack(key) => {
                buf.push(TAG_ACK);
                buf.extend_from_slice(&key.to_le_bytes());
            }
            Message::AckAck => buf.push(TAG_ACK),
        }
        buf
    }
}

/// Decode a bare 4-byte little-endian public key.
pub fn decode_key(bytes: &[u8]) -> Result<PublicKey, MessageError> {
    let raw: [u8; PUBLIC_KEY_SIZE] = bytes
        .get(..PUBLIC_KEY_SIZE)
        .and_then(|s| s.try_into().ok())
        .ok_or(MessageError::Truncated {
            expected: PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        })?;
    Ok(PublicKey::from_le_bytes(raw))
}

/// Decode an `ACK(key)` as seen by the initiator.
pub fn decode_ack(bytes: &[u8]) -> Result<PublicKey, MessageError> {
    let (&tag, rest) = bytes.split_first().ok_or(MessageError::Truncated {
        expected: KEYED_MESSAGE_SIZE,
        actual: 0,
    })?;
    if tag != TAG_ACK {
        return Err(MessageError::UnexpectedTag(tag));
    }
    decode_key(rest).map_err(|_| MessageError::Truncated {
        expected: KEYED_MESSAGE_SIZE,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request() {
        let msg = Message::Request(PublicKey::from_u32(0x0403_0201));
        assert_eq!(msg.encode(), vec![b'C', 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(msg.wire_len(), 5);
    }

    #[test]
    fn test_encode_ack_and_ackack() {
        let ack = Message::Ack(PublicKey::from_u32(282_475_249));
        assert_eq!(hex::encode(ack.encode()), "41f13ad610");
        assert_eq!(Message::AckAck.encode(), vec![b'A']);
        assert_eq!(Message::AckAck.wire_len(), 1);
    }

    #[test]
    fn test_decode_ack() {
        let key = PublicKey::from_u32(761_890_985);
        let bytes = Message::Ack(key).encode();
        assert_eq!(decode_ack(&bytes), Ok(key));
    }

    #[test]
    fn test_decode_ack_wrong_tag() {
        let bytes = Message::Request(PublicKey::from_u32(1)).encode();
        assert_eq!(decode_ack(&bytes), Err(MessageError::UnexpectedTag(b'C')));
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(
            decode_ack(&[b'A', 1, 2]),
            Err(MessageError::Truncated {
                expected: 5,
                actual: 3
            })
        );
        assert_eq!(
            decode_key(&[]),
            Err(MessageError::Truncated {
                expected: 4,
                actual: 0
            })
        );
    }
}
