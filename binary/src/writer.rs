//! Append-only writer for encoding packet payloads.

use crate::position::BlockPosition;
use crate::types::{EntityId, Uuid};
use crate::varint::{CONTINUATION_BIT, PAYLOAD_MASK};

/// An append-only byte buffer for encoding packet payloads.
///
/// Writes never fail; the buffer grows as needed. Call
/// [`finish`](Self::finish) to take the encoded bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Discards the contents while keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Appends raw bytes without a length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a single `u8`.
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Writes a single `i8`.
    pub fn write_i8(&mut self, value: i8) {
        self.bytes.push(value as u8);
    }

    /// Writes a boolean as `0x01` or `0x00`.
    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    /// Writes a `u16` (big-endian).
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `u16` (little-endian).
    pub fn write_u16_le(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `i16` (big-endian).
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `i16` (little-endian).
    pub fn write_i16_le(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `u32` (big-endian).
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `u32` (little-endian).
    pub fn write_u32_le(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `i32` (big-endian).
    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `i32` (little-endian).
    pub fn write_i32_le(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `u64` (big-endian).
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `u64` (little-endian).
    pub fn write_u64_le(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `i64` (big-endian).
    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a `i64` (little-endian).
    pub fn write_i64_le(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a `f32` (big-endian).
    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    /// Writes a `f32` (little-endian).
    pub fn write_f32_le(&mut self, value: f32) {
        self.write_u32_le(value.to_bits());
    }

    /// Writes a `f64` (big-endian).
    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Writes a `f64` (little-endian).
    pub fn write_f64_le(&mut self, value: f64) {
        self.write_u64_le(value.to_bits());
    }

    /// Writes the low 24 bits of `value`, most significant byte first.
    pub fn write_triad(&mut self, value: u32) {
        let [_, b0, b1, b2] = value.to_be_bytes();
        self.write_bytes(&[b0, b1, b2]);
    }

    /// Writes the low 24 bits of `value`, least significant byte first.
    pub fn write_triad_le(&mut self, value: u32) {
        let [b0, b1, b2, _] = value.to_le_bytes();
        self.write_bytes(&[b0, b1, b2]);
    }

    /// Writes an unsigned 32-bit varint.
    pub fn write_var_u32(&mut self, value: u32) {
        self.write_varint(u64::from(value));
    }

    /// Writes the two's-complement bits of `value` as a 32-bit varint.
    ///
    /// Negative values always take five bytes.
    pub fn write_var_i32(&mut self, value: i32) {
        self.write_var_u32(value as u32);
    }

    /// Writes an unsigned 64-bit varint.
    pub fn write_var_u64(&mut self, value: u64) {
        self.write_varint(value);
    }

    /// Writes the two's-complement bits of `value` as a 64-bit varint.
    ///
    /// Negative values always take ten bytes.
    pub fn write_var_i64(&mut self, value: i64) {
        self.write_varint(value as u64);
    }

    /// Writes a varint length prefix followed by `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is longer than `u32::MAX`.
    pub fn write_byte_array(&mut self, bytes: &[u8]) {
        let len = u32::try_from(bytes.len()).expect("byte array length exceeds u32::MAX");
        self.write_var_u32(len);
        self.write_bytes(bytes);
    }

    /// Writes a varint byte-length prefix followed by the UTF-8 bytes of `value`.
    pub fn write_string(&mut self, value: &str) {
        self.write_byte_array(value.as_bytes());
    }

    /// Writes a 128-bit identifier (high half first, big-endian).
    pub fn write_uuid(&mut self, value: Uuid) {
        self.write_u64(value.high);
        self.write_u64(value.low);
    }

    /// Writes a packed block position as a signed 64-bit varint.
    ///
    /// Axes outside their bit width are truncated; see
    /// [`BlockPosition::is_representable`].
    pub fn write_block_position(&mut self, value: BlockPosition) {
        self.write_var_i64(value.pack());
    }

    /// Writes an entity identifier.
    pub fn write_entity_id(&mut self, value: EntityId) {
        self.write_var_i32(value.0);
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }

    fn write_varint(&mut self, mut value: u64) {
        loop {
            let mut byte = (value as u8) & PAYLOAD_MASK;
            value >>= 7;
            if value != 0 {
                byte |= CONTINUATION_BIT;
            }
            self.bytes.push(byte);
            if value == 0 {
                break;
            }
        }
    }
}
