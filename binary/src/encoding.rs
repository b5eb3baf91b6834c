//! Traits for composing packet fields.

use crate::error::BinaryResult;
use crate::position::BlockPosition;
use crate::reader::ByteCursor;
use crate::types::{EntityId, Uuid};
use crate::writer::ByteWriter;

/// A value with a fixed wire encoding.
pub trait Encode {
    fn encode(&self, writer: &mut ByteWriter);
}

/// A value that can be read back from its wire encoding.
pub trait Decode: Sized {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self>;
}

impl Encode for bool {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_bool(*self);
    }
}

impl Decode for bool {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        cursor.read_bool()
    }
}

impl Encode for str {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(self);
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(self);
    }
}

impl Decode for String {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        cursor.read_string()
    }
}

impl Encode for Uuid {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_uuid(*self);
    }
}

impl Decode for Uuid {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        cursor.read_uuid()
    }
}

impl Encode for BlockPosition {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_block_position(*self);
    }
}

impl Decode for BlockPosition {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        cursor.read_block_position()
    }
}

impl Encode for EntityId {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_entity_id(*self);
    }
}

impl Decode for EntityId {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        cursor.read_entity_id()
    }
}

impl<T: Encode> Encode for Option<T> {
    /// Writes a presence flag followed by the value when present.
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_bool(self.is_some());
        if let Some(value) = self {
            value.encode(writer);
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self> {
        if cursor.read_bool()? {
            T::decode(cursor).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: &T) {
        let mut writer = ByteWriter::new();
        value.encode(&mut writer);
        let bytes = writer.finish();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(&T::decode(&mut cursor).unwrap(), value);
        assert!(cursor.is_empty(), "decode should consume every byte");
    }

    #[test]
    fn compound_values_roundtrip() {
        roundtrip(&Uuid::from_u128(u128::MAX - 1));
        roundtrip(&BlockPosition::new(-1000, 64, 2000));
        roundtrip(&EntityId(-42));
        roundtrip(&String::from("quarry"));
        roundtrip(&true);
    }

    #[test]
    fn option_presence_flag() {
        roundtrip(&Some(EntityId(9)));
        roundtrip(&Option::<EntityId>::None);

        let mut writer = ByteWriter::new();
        Option::<Uuid>::None.encode(&mut writer);
        assert_eq!(writer.finish(), vec![0x00]);
    }

    #[test]
    fn str_and_string_encode_identically() {
        let mut a = ByteWriter::new();
        let mut b = ByteWriter::new();
        "héllo".encode(&mut a);
        String::from("héllo").encode(&mut b);
        assert_eq!(a, b);
    }
}
