//! Batch framing: several packets carried in one payload.
//!
//! A batch is a sequence of entries, each a `var_u32` byte length followed by
//! one encoded packet (id and body). There is no count prefix; the batch ends
//! with the payload.

use binary::{var_u32_len, ByteCursor, ByteWriter};

use crate::error::{LimitKind, WireError, WireResult};
use crate::limits::Limits;
use crate::packet::{encode_packet, split_packet, Packet, RawPacket};

/// Appends one length-prefixed packet payload to a batch.
pub fn encode_batch_entry(writer: &mut ByteWriter, payload: &[u8]) -> WireResult<()> {
    let len = u32::try_from(payload.len()).map_err(|_| WireError::LengthOverflow {
        length: payload.len(),
    })?;
    writer.write_var_u32(len);
    writer.write_bytes(payload);
    Ok(())
}

/// Encodes a packet and appends it to a batch as one entry.
pub fn encode_batch_packet<P: Packet>(writer: &mut ByteWriter, packet: &P) -> WireResult<()> {
    let mut body = ByteWriter::new();
    encode_packet(packet, &mut body);
    encode_batch_entry(writer, body.as_slice())
}

/// Encodes a sequence of packet payloads into one batch.
pub fn encode_batch<'a, I>(payloads: I) -> WireResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut writer = ByteWriter::new();
    for payload in payloads {
        encode_batch_entry(&mut writer, payload)?;
    }
    Ok(writer.finish())
}

/// Returns the encoded size of a batch entry holding `payload_len` bytes.
#[must_use]
pub fn batch_entry_len(payload_len: u32) -> usize {
    var_u32_len(payload_len) + payload_len as usize
}

/// Decodes a batch into borrowed packet payloads.
///
/// Any framing error rejects the whole batch; no partial result is returned.
pub fn decode_batch<'a>(bytes: &'a [u8], limits: &Limits) -> WireResult<Vec<&'a [u8]>> {
    if bytes.len() > limits.max_batch_bytes {
        return Err(WireError::LimitsExceeded {
            kind: LimitKind::BatchBytes,
            limit: limits.max_batch_bytes,
            actual: bytes.len(),
        });
    }

    let mut cursor = ByteCursor::new(bytes);
    let mut payloads = Vec::new();

    while !cursor.is_empty() {
        if payloads.len() >= limits.max_packets {
            return Err(WireError::LimitsExceeded {
                kind: LimitKind::PacketCount,
                limit: limits.max_packets,
                actual: payloads.len() + 1,
            });
        }

        let len = cursor.read_var_u32()? as usize;
        if len > limits.max_packet_len {
            return Err(WireError::LimitsExceeded {
                kind: LimitKind::PacketLength,
                limit: limits.max_packet_len,
                actual: len,
            });
        }
        payloads.push(cursor.read_bytes(len)?);
    }

    Ok(payloads)
}

/// Decodes a batch and splits every entry into its packet id and body.
pub fn decode_batch_packets<'a>(bytes: &'a [u8], limits: &Limits) -> WireResult<Vec<RawPacket<'a>>> {
    decode_batch(bytes, limits)?
        .into_iter()
        .map(split_packet)
        .collect()
}
