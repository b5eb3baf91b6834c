//! Variable-length integer constants and size helpers.
//!
//! Varints use 7-bit little-endian groups with the high bit of each byte as a
//! continuation flag. Signed values are encoded as the raw two's-complement
//! bit pattern of their width (no zig-zag), so negative numbers always take the
//! maximum number of groups.

/// Maximum number of groups in a 32-bit varint.
pub const MAX_VARINT32_LEN: usize = 5;

/// Maximum number of groups in a 64-bit varint.
pub const MAX_VARINT64_LEN: usize = 10;

pub(crate) const CONTINUATION_BIT: u8 = 0x80;
pub(crate) const PAYLOAD_MASK: u8 = 0x7F;

/// Returns the encoded length of an unsigned 32-bit varint.
#[must_use]
pub const fn var_u32_len(value: u32) -> usize {
    var_u64_len(value as u64)
}

/// Returns the encoded length of an unsigned 64-bit varint.
#[must_use]
pub const fn var_u64_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Returns the encoded length of a signed 32-bit varint.
#[must_use]
pub const fn var_i32_len(value: i32) -> usize {
    var_u32_len(value as u32)
}

/// Returns the encoded length of a signed 64-bit varint.
#[must_use]
pub const fn var_i64_len(value: i64) -> usize {
    var_u64_len(value as u64)
}
