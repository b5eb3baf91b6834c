//! Bit-packed block positions.
//!
//! A position packs three signed axes into one 64-bit value:
//!
//! ```text
//!  63            38 37      26 25             0
//! +----------------+----------+----------------+
//! |   x (26 bits)  | y (12)   |   z (26 bits)  |
//! +----------------+----------+----------------+
//! ```
//!
//! The packed value is carried on the wire as a signed 64-bit varint.

const XZ_BITS: u32 = 26;
const Y_BITS: u32 = 12;

const X_SHIFT: u32 = Y_BITS + XZ_BITS;
const Y_SHIFT: u32 = XZ_BITS;

const XZ_MASK: i64 = (1 << XZ_BITS) - 1;
const Y_MASK: i64 = (1 << Y_BITS) - 1;

/// A point in the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    /// Smallest representable x or z coordinate.
    pub const MIN_HORIZONTAL: i32 = -(1 << (XZ_BITS - 1));
    /// Largest representable x or z coordinate.
    pub const MAX_HORIZONTAL: i32 = (1 << (XZ_BITS - 1)) - 1;
    /// Smallest representable y coordinate.
    pub const MIN_VERTICAL: i32 = -(1 << (Y_BITS - 1));
    /// Largest representable y coordinate.
    pub const MAX_VERTICAL: i32 = (1 << (Y_BITS - 1)) - 1;

    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns `true` if every axis fits its bit width.
    ///
    /// Coordinates outside the range are truncated by [`pack`](Self::pack)
    /// and will not survive a round trip.
    #[must_use]
    pub const fn is_representable(self) -> bool {
        self.x >= Self::MIN_HORIZONTAL
            && self.x <= Self::MAX_HORIZONTAL
            && self.y >= Self::MIN_VERTICAL
            && self.y <= Self::MAX_VERTICAL
            && self.z >= Self::MIN_HORIZONTAL
            && self.z <= Self::MAX_HORIZONTAL
    }

    /// Packs the position into a single 64-bit value.
    #[must_use]
    pub const fn pack(self) -> i64 {
        ((self.x as i64 & XZ_MASK) << X_SHIFT)
            | ((self.y as i64 & Y_MASK) << Y_SHIFT)
            | (self.z as i64 & XZ_MASK)
    }

    /// Unpacks a 64-bit value, sign-extending each axis.
    #[must_use]
    pub const fn unpack(value: i64) -> Self {
        let x = value >> X_SHIFT;
        let y = (value << (64 - X_SHIFT)) >> (64 - Y_BITS);
        let z = (value << (64 - XZ_BITS)) >> (64 - XZ_BITS);
        Self {
            x: x as i32,
            y: y as i32,
            z: z as i32,
        }
    }
}
