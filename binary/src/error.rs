//! Error types for byte-level decoding.

use thiserror::Error;

/// Result type for decode operations.
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Errors that can occur while decoding a packet payload.
///
/// Every variant is fatal for the packet being decoded: the caller must drop
/// the remainder of the payload instead of trying to resynchronize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read {requested} bytes at position {position} but only {available} bytes available")]
    UnexpectedEof {
        /// Cursor position at the time of the read.
        position: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A variable-length integer did not terminate within its group budget.
    #[error("varint did not terminate within {max_groups} groups")]
    InvalidVarint {
        /// Maximum number of 7-bit groups for the decoded width.
        max_groups: usize,
    },

    /// A length-prefixed string body is not valid UTF-8.
    #[error("string at position {position} is not valid utf-8")]
    InvalidUtf8 {
        /// Cursor position of the first byte of the string body.
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_eof() {
        let err = BinaryError::UnexpectedEof {
            position: 12,
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention requested bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
        assert!(msg.contains("12"), "should mention the position");
    }

    #[test]
    fn error_display_invalid_varint() {
        let err = BinaryError::InvalidVarint { max_groups: 5 };
        let msg = err.to_string();
        assert!(msg.contains("varint"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn error_display_invalid_utf8() {
        let err = BinaryError::InvalidUtf8 { position: 1 };
        assert!(err.to_string().contains("utf-8"));
    }

    #[test]
    fn error_equality() {
        let err1 = BinaryError::InvalidVarint { max_groups: 5 };
        let err2 = BinaryError::InvalidVarint { max_groups: 5 };
        let err3 = BinaryError::InvalidVarint { max_groups: 10 };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<BinaryError>();
    }
}
