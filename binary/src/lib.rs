//! Byte-level encoding primitives for the quarry protocol.
//!
//! This crate provides [`ByteWriter`] and [`ByteCursor`] for encoding and
//! decoding packet payloads: fixed-width integers and floats in both byte
//! orders, 24-bit triads, varints, length-prefixed strings, 128-bit
//! identifiers, packed block positions and entity identifiers.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded reads** - Every read is bounds-checked; truncated input is an error, never a default.
//! - **No domain knowledge** - This crate knows nothing about packets, sessions or game state.
//! - **The cursor owns its position** - Decoders advance the cursor they are given, so a
//!   sequence of reads always resumes where the previous one stopped.
//!
//! # Example
//!
//! ```
//! use binary::{BlockPosition, ByteCursor, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_var_u32(300);
//! writer.write_string("stone");
//! writer.write_block_position(BlockPosition::new(-1000, 64, 2000));
//!
//! let bytes = writer.finish();
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! assert_eq!(cursor.read_var_u32().unwrap(), 300);
//! assert_eq!(cursor.read_string().unwrap(), "stone");
//! assert_eq!(
//!     cursor.read_block_position().unwrap(),
//!     BlockPosition::new(-1000, 64, 2000)
//! );
//! assert!(cursor.is_empty());
//! ```

mod encoding;
mod error;
mod position;
mod reader;
mod types;
mod varint;
mod writer;

pub use encoding::{Decode, Encode};
pub use error::{BinaryError, BinaryResult};
pub use position::BlockPosition;
pub use reader::ByteCursor;
pub use types::{EntityId, Uuid};
pub use varint::{
    var_i32_len, var_i64_len, var_u32_len, var_u64_len, MAX_VARINT32_LEN, MAX_VARINT64_LEN,
};
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let cursor = ByteCursor::new(&bytes);
        assert!(cursor.is_empty());
    }

    #[test]
    fn fixed_width_extremes_roundtrip() {
        let mut writer = ByteWriter::new();
        for value in [i16::MIN, -1, 0, i16::MAX] {
            writer.write_i16(value);
            writer.write_i16_le(value);
        }
        for value in [u32::MIN, 1, u32::MAX] {
            writer.write_u32(value);
            writer.write_u32_le(value);
        }
        for value in [i64::MIN, -1, 0, i64::MAX] {
            writer.write_i64(value);
            writer.write_i64_le(value);
        }
        let bytes = writer.finish();

        let mut cursor = ByteCursor::new(&bytes);
        for value in [i16::MIN, -1, 0, i16::MAX] {
            assert_eq!(cursor.read_i16().unwrap(), value);
            assert_eq!(cursor.read_i16_le().unwrap(), value);
        }
        for value in [u32::MIN, 1, u32::MAX] {
            assert_eq!(cursor.read_u32().unwrap(), value);
            assert_eq!(cursor.read_u32_le().unwrap(), value);
        }
        for value in [i64::MIN, -1, 0, i64::MAX] {
            assert_eq!(cursor.read_i64().unwrap(), value);
            assert_eq!(cursor.read_i64_le().unwrap(), value);
        }
        assert!(cursor.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_bool(true);
        writer.write_triad_le(0x00AB_CDEF);
        writer.write_var_i32(-5);
        writer.write_f64(-0.5);
        writer.write_entity_id(EntityId(77));
        writer.write_uuid(Uuid::new(u64::MAX, 3));
        let bytes = writer.finish();

        let mut cursor = ByteCursor::new(&bytes);
        assert!(cursor.read_bool().unwrap());
        assert_eq!(cursor.read_triad_le().unwrap(), 0x00AB_CDEF);
        assert_eq!(cursor.read_var_i32().unwrap(), -5);
        assert_eq!(cursor.read_f64().unwrap(), -0.5);
        assert_eq!(cursor.read_entity_id().unwrap(), EntityId(77));
        assert_eq!(cursor.read_uuid().unwrap(), Uuid::new(u64::MAX, 3));
        assert_eq!(cursor.position(), bytes.len());
    }

    #[test]
    fn doctest_example() {
        let mut writer = ByteWriter::new();
        writer.write_var_u32(300);
        writer.write_string("stone");

        let bytes = writer.finish();

        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_var_u32().unwrap(), 300);
        assert_eq!(cursor.read_string().unwrap(), "stone");
    }
}
