//! Packet identity and body framing.
//!
//! A packet on the wire is a `var_u32` packet id followed by the body fields in
//! the order the packet definition writes them.

use binary::{BinaryResult, ByteCursor, ByteWriter};

use crate::error::{WireError, WireResult};

/// A packet definition with a fixed id and field order.
pub trait Packet: Sized {
    /// Packet id written ahead of the body.
    const ID: u32;

    /// Writes the body fields in wire order.
    fn encode_body(&self, writer: &mut ByteWriter);

    /// Reads the body fields in the same order [`encode_body`](Self::encode_body) wrote them.
    fn decode_body(cursor: &mut ByteCursor<'_>) -> BinaryResult<Self>;
}

/// A packet split into its id and undecoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    pub id: u32,
    pub body: &'a [u8],
}

impl RawPacket<'_> {
    /// Decodes the body as `P`, checking the id and rejecting trailing bytes.
    pub fn decode<P: Packet>(&self) -> WireResult<P> {
        if self.id != P::ID {
            return Err(WireError::UnexpectedPacketId {
                expected: P::ID,
                found: self.id,
            });
        }
        let mut cursor = ByteCursor::new(self.body);
        let packet = P::decode_body(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(WireError::TrailingBytes {
                id: self.id,
                remaining: cursor.remaining(),
            });
        }
        Ok(packet)
    }
}

/// Encodes a packet id and body into `writer`.
pub fn encode_packet<P: Packet>(packet: &P, writer: &mut ByteWriter) {
    writer.write_var_u32(P::ID);
    packet.encode_body(writer);
}

/// Encodes a packet into a fresh buffer.
#[must_use]
pub fn packet_to_vec<P: Packet>(packet: &P) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    encode_packet(packet, &mut writer);
    writer.finish()
}

/// Reads the packet id and returns it with the remaining body.
pub fn split_packet(bytes: &[u8]) -> WireResult<RawPacket<'_>> {
    let mut cursor = ByteCursor::new(bytes);
    let id = cursor.read_var_u32()?;
    Ok(RawPacket {
        id,
        body: cursor.remaining_bytes(),
    })
}

/// Decodes a complete packet of type `P`.
pub fn decode_packet<P: Packet>(bytes: &[u8]) -> WireResult<P> {
    split_packet(bytes)?.decode()
}
