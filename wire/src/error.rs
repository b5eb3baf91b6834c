//! Error types for wire framing.

use std::fmt;

use binary::BinaryError;
use thiserror::Error;

/// Result type for wire framing operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while framing or unframing packets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    /// A primitive field failed to decode.
    #[error(transparent)]
    Binary(#[from] BinaryError),

    /// The packet id does not match the packet type being decoded.
    #[error("unexpected packet id: expected 0x{expected:02X}, found 0x{found:02X}")]
    UnexpectedPacketId { expected: u32, found: u32 },

    /// The packet body decoded without consuming every byte.
    #[error("packet 0x{id:02X} has {remaining} trailing bytes")]
    TrailingBytes { id: u32, remaining: usize },

    /// Limits exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A payload is too large for its varint length prefix.
    #[error("length overflow: {length}")]
    LengthOverflow { length: usize },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    BatchBytes,
    PacketCount,
    PacketLength,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BatchBytes => "batch bytes",
            Self::PacketCount => "packet count",
            Self::PacketLength => "packet length",
        };
        write!(f, "{name}")
    }
}

impl WireError {
    /// Returns `true` if the input was cut short rather than malformed.
    #[must_use]
    pub const fn is_truncation(&self) -> bool {
        matches!(self, Self::Binary(BinaryError::UnexpectedEof { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unexpected_packet_id() {
        let err = WireError::UnexpectedPacketId {
            expected: 0x01,
            found: 0xFE,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x01"));
        assert!(msg.contains("0xFE"));
    }

    #[test]
    fn display_limits_exceeded() {
        let err = WireError::LimitsExceeded {
            kind: LimitKind::PacketCount,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("packet count"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn binary_errors_are_transparent() {
        let inner = BinaryError::InvalidVarint { max_groups: 5 };
        let err = WireError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert!(!err.is_truncation());
    }

    #[test]
    fn truncation_is_detected() {
        let err = WireError::from(BinaryError::UnexpectedEof {
            position: 0,
            requested: 1,
            available: 0,
        });
        assert!(err.is_truncation());
    }
}
