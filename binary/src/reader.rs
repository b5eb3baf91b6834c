//! Byte cursor with bounded reads.

use crate::error::{BinaryError, BinaryResult};
use crate::position::BlockPosition;
use crate::types::{EntityId, Uuid};
use crate::varint::{CONTINUATION_BIT, MAX_VARINT32_LEN, MAX_VARINT64_LEN, PAYLOAD_MASK};

const TRIAD_MASK: u32 = 0x00FF_FFFF;

/// A cursor over an encoded packet payload.
///
/// Every read is bounds-checked and advances the cursor by exactly the number
/// of bytes it consumed. A failed read leaves the payload unusable; callers
/// should abandon the packet rather than keep reading.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a new cursor at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the total length of the underlying buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the current read position in bytes.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if every byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread tail without advancing.
    #[must_use]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Reads the next `len` bytes.
    ///
    /// A zero-length read always succeeds and leaves the cursor in place.
    pub fn read_bytes(&mut self, len: usize) -> BinaryResult<&'a [u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        self.ensure_bytes(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a single `u8`.
    pub fn read_u8(&mut self) -> BinaryResult<u8> {
        self.ensure_bytes(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Reads a single `i8`.
    pub fn read_i8(&mut self) -> BinaryResult<i8> {
        self.read_u8().map(|byte| byte as i8)
    }

    /// Reads a boolean; any nonzero byte is `true`.
    pub fn read_bool(&mut self) -> BinaryResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a `u16` (big-endian).
    pub fn read_u16(&mut self) -> BinaryResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Reads a `u16` (little-endian).
    pub fn read_u16_le(&mut self) -> BinaryResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a `i16` (big-endian).
    pub fn read_i16(&mut self) -> BinaryResult<i16> {
        self.read_array().map(i16::from_be_bytes)
    }

    /// Reads a `i16` (little-endian).
    pub fn read_i16_le(&mut self) -> BinaryResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Reads a `u32` (big-endian).
    pub fn read_u32(&mut self) -> BinaryResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Reads a `u32` (little-endian).
    pub fn read_u32_le(&mut self) -> BinaryResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a `i32` (big-endian).
    pub fn read_i32(&mut self) -> BinaryResult<i32> {
        self.read_array().map(i32::from_be_bytes)
    }

    /// Reads a `i32` (little-endian).
    pub fn read_i32_le(&mut self) -> BinaryResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Reads a `u64` (big-endian).
    pub fn read_u64(&mut self) -> BinaryResult<u64> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// Reads a `u64` (little-endian).
    pub fn read_u64_le(&mut self) -> BinaryResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a `i64` (big-endian).
    pub fn read_i64(&mut self) -> BinaryResult<i64> {
        self.read_array().map(i64::from_be_bytes)
    }

    /// Reads a `i64` (little-endian).
    pub fn read_i64_le(&mut self) -> BinaryResult<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Reads a `f32` (big-endian).
    pub fn read_f32(&mut self) -> BinaryResult<f32> {
        self.read_u32().map(f32::from_bits)
    }

    /// Reads a `f32` (little-endian).
    pub fn read_f32_le(&mut self) -> BinaryResult<f32> {
        self.read_u32_le().map(f32::from_bits)
    }

    /// Reads a `f64` (big-endian).
    pub fn read_f64(&mut self) -> BinaryResult<f64> {
        self.read_u64().map(f64::from_bits)
    }

    /// Reads a `f64` (little-endian).
    pub fn read_f64_le(&mut self) -> BinaryResult<f64> {
        self.read_u64_le().map(f64::from_bits)
    }

    /// Reads a big-endian 24-bit unsigned integer.
    pub fn read_triad(&mut self) -> BinaryResult<u32> {
        let [b0, b1, b2] = self.read_array::<3>()?;
        Ok(u32::from_be_bytes([0, b0, b1, b2]) & TRIAD_MASK)
    }

    /// Reads a little-endian 24-bit unsigned integer.
    pub fn read_triad_le(&mut self) -> BinaryResult<u32> {
        let [b0, b1, b2] = self.read_array::<3>()?;
        Ok(u32::from_le_bytes([b0, b1, b2, 0]) & TRIAD_MASK)
    }

    /// Reads an unsigned 32-bit varint (at most 5 groups).
    pub fn read_var_u32(&mut self) -> BinaryResult<u32> {
        // Bits past the 32nd in the fifth group are discarded.
        self.read_varint(MAX_VARINT32_LEN).map(|value| value as u32)
    }

    /// Reads a signed 32-bit varint encoded from its two's-complement bits.
    pub fn read_var_i32(&mut self) -> BinaryResult<i32> {
        self.read_var_u32().map(|value| value as i32)
    }

    /// Reads an unsigned 64-bit varint (at most 10 groups).
    pub fn read_var_u64(&mut self) -> BinaryResult<u64> {
        self.read_varint(MAX_VARINT64_LEN)
    }

    /// Reads a signed 64-bit varint encoded from its two's-complement bits.
    pub fn read_var_i64(&mut self) -> BinaryResult<i64> {
        self.read_var_u64().map(|value| value as i64)
    }

    /// Reads a varint-length-prefixed byte array.
    pub fn read_byte_array(&mut self) -> BinaryResult<&'a [u8]> {
        let len = self.read_var_u32()? as usize;
        self.read_bytes(len)
    }

    /// Reads a varint-length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> BinaryResult<&'a str> {
        let len = self.read_var_u32()? as usize;
        let position = self.pos;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| BinaryError::InvalidUtf8 { position })
    }

    /// Reads a varint-length-prefixed UTF-8 string into an owned `String`.
    pub fn read_string(&mut self) -> BinaryResult<String> {
        self.read_str().map(str::to_owned)
    }

    /// Reads a 128-bit identifier (high half first, big-endian).
    pub fn read_uuid(&mut self) -> BinaryResult<Uuid> {
        let high = self.read_u64()?;
        let low = self.read_u64()?;
        Ok(Uuid::new(high, low))
    }

    /// Reads a packed block position.
    pub fn read_block_position(&mut self) -> BinaryResult<BlockPosition> {
        self.read_var_i64().map(BlockPosition::unpack)
    }

    /// Reads an entity identifier.
    pub fn read_entity_id(&mut self) -> BinaryResult<EntityId> {
        self.read_var_i32().map(EntityId)
    }

    fn read_varint(&mut self, max_groups: usize) -> BinaryResult<u64> {
        let mut value = 0u64;
        for group in 0..max_groups {
            let byte = self.read_u8()?;
            value |= u64::from(byte & PAYLOAD_MASK) << (7 * group);
            if byte & CONTINUATION_BIT == 0 {
                return Ok(value);
            }
        }
        Err(BinaryError::InvalidVarint { max_groups })
    }

    fn ensure_bytes(&self, len: usize) -> BinaryResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(BinaryError::UnexpectedEof {
                position: self.pos,
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> BinaryResult<[u8; N]> {
        self.ensure_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}
