//! Packet framing and batch layout for the quarry protocol.
//!
//! This crate frames packets on top of the [`binary`] codec: a packet is a
//! varint id followed by its body, and a batch carries several
//! length-prefixed packets in one payload. It does not know what any
//! individual packet means.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Batch and packet lengths are checked against [`Limits`] before slicing.
//! - **All or nothing** - A framing error rejects the whole batch; there is no partial recovery.
//! - **No domain knowledge** - Packet definitions live with the code that handles them.

mod batch;
mod error;
mod limits;
mod packet;

pub use batch::{
    batch_entry_len, decode_batch, decode_batch_packets, encode_batch, encode_batch_entry,
    encode_batch_packet,
};
pub use error::{LimitKind, WireError, WireResult};
pub use limits::Limits;
pub use packet::{decode_packet, encode_packet, packet_to_vec, split_packet, Packet, RawPacket};
