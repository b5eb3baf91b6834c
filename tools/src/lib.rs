//! Introspection and debugging tools for the quarry protocol.
//!
//! This crate provides utilities for looking at captured traffic and packed
//! values:
//!
//! - Split a batch capture into packets and report their ids and sizes
//! - Pack and unpack block positions, showing the varint bytes on the wire
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what is actually on the wire.

use binary::{var_u32_len, BlockPosition, ByteWriter};
use serde::Serialize;
use wire::{decode_batch, split_packet, Limits, WireResult};

/// Summary of one batch capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub batch_len: usize,
    pub packets: Vec<PacketSummary>,
}

/// One packet within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketSummary {
    pub id: u32,
    /// Bytes taken by the entry, length prefix included.
    pub entry_len: usize,
    pub body_len: usize,
}

impl InspectReport {
    /// Sum of all packet body lengths.
    #[must_use]
    pub fn body_bytes(&self) -> usize {
        self.packets.iter().map(|packet| packet.body_len).sum()
    }

    /// Bytes spent on length prefixes and packet ids.
    #[must_use]
    pub fn framing_bytes(&self) -> usize {
        self.batch_len - self.body_bytes()
    }
}

/// Splits a batch into packets under `limits`.
pub fn inspect_batch(bytes: &[u8], limits: &Limits) -> WireResult<InspectReport> {
    let packets = decode_batch(bytes, limits)?
        .into_iter()
        .map(|payload| {
            let raw = split_packet(payload)?;
            let payload_len = payload.len();
            Ok(PacketSummary {
                id: raw.id,
                entry_len: var_u32_len(payload_len as u32) + payload_len,
                body_len: raw.body.len(),
            })
        })
        .collect::<WireResult<Vec<_>>>()?;
    Ok(InspectReport {
        batch_len: bytes.len(),
        packets,
    })
}

/// A block position with its packed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionReport {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub packed: i64,
    /// `var_i64` encoding of `packed`.
    pub varint_bytes: Vec<u8>,
    /// Whether packing preserves every coordinate.
    pub representable: bool,
}

impl PositionReport {
    fn new(position: BlockPosition, packed: i64) -> Self {
        let mut writer = ByteWriter::new();
        writer.write_var_i64(packed);
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            packed,
            varint_bytes: writer.finish(),
            representable: position.is_representable(),
        }
    }
}

/// Packs coordinates, reporting the wrapped result for out-of-range axes.
#[must_use]
pub fn pack_position(x: i32, y: i32, z: i32) -> PositionReport {
    let position = BlockPosition::new(x, y, z);
    PositionReport::new(position, position.pack())
}

/// Unpacks a packed position value.
#[must_use]
pub fn unpack_position(packed: i64) -> PositionReport {
    PositionReport::new(BlockPosition::unpack(packed), packed)
}

/// Formats bytes as space separated hex pairs.
#[must_use]
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use wire::{encode_batch, WireError};

    use super::*;

    #[test]
    fn inspect_reports_each_packet() {
        let first = [0x05u8, 0xAA, 0xBB];
        let second = [0x80u8, 0x04];
        let bytes = encode_batch([&first[..], &second[..]]).unwrap();

        let report = inspect_batch(&bytes, &Limits::for_testing()).unwrap();
        assert_eq!(report.batch_len, 7);
        assert_eq!(
            report.packets,
            vec![
                PacketSummary {
                    id: 0x05,
                    entry_len: 4,
                    body_len: 2,
                },
                PacketSummary {
                    id: 0x200,
                    entry_len: 3,
                    body_len: 0,
                },
            ]
        );
        assert_eq!(report.body_bytes(), 2);
        assert_eq!(report.framing_bytes(), 5);
    }

    #[test]
    fn inspect_rejects_truncated_batch() {
        let err = inspect_batch(&[0x03, 0x01], &Limits::for_testing()).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn inspect_rejects_empty_entry() {
        let err = inspect_batch(&[0x00], &Limits::for_testing()).unwrap_err();
        assert!(matches!(err, WireError::Binary(_)));
    }

    #[test]
    fn position_pack_and_unpack_agree() {
        let packed = pack_position(-1, 64, 12);
        assert!(packed.representable);
        let unpacked = unpack_position(packed.packed);
        assert_eq!((unpacked.x, unpacked.y, unpacked.z), (-1, 64, 12));
        assert_eq!(unpacked.varint_bytes, packed.varint_bytes);
    }

    #[test]
    fn out_of_range_position_is_flagged() {
        let report = pack_position(1 << 25, 0, 0);
        assert!(!report.representable);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(format_hex(&[0x00, 0xAB, 0x7F]), "00 ab 7f");
        assert_eq!(format_hex(&[]), "");
    }

    #[test]
    fn report_serializes_to_json() {
        let report = inspect_batch(&[0x01, 0x07], &Limits::for_testing()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["batch_len"], 2);
        assert_eq!(json["packets"][0]["id"], 7);
    }
}
