//! Per-peer session state.

use std::net::SocketAddr;

/// Traffic counters for one connected peer.
///
/// A session lives until the peer disconnects or sends a batch that fails to
/// decode, at which point the context discards it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    addr: SocketAddr,
    opened_at_tick: u64,
    batches_received: u64,
    packets_received: u64,
    bytes_received: u64,
}

impl Session {
    pub(crate) const fn new(addr: SocketAddr, opened_at_tick: u64) -> Self {
        Self {
            addr,
            opened_at_tick,
            batches_received: 0,
            packets_received: 0,
            bytes_received: 0,
        }
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Server tick at which the session was opened.
    #[must_use]
    pub const fn opened_at_tick(&self) -> u64 {
        self.opened_at_tick
    }

    #[must_use]
    pub const fn batches_received(&self) -> u64 {
        self.batches_received
    }

    #[must_use]
    pub const fn packets_received(&self) -> u64 {
        self.packets_received
    }

    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub(crate) fn record_batch(&mut self, bytes: usize, packets: usize) {
        self.batches_received += 1;
        self.bytes_received += bytes as u64;
        self.packets_received += packets as u64;
    }
}
