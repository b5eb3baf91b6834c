//! Configurable limits for bounded decoding.

/// Wire-level limits for batch decoding.
///
/// These limits are enforced before iterating or slicing so that a hostile
/// length prefix cannot drive resource usage. Limits on individual fields
/// belong to packet definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum batch size in bytes.
    pub max_batch_bytes: usize,

    /// Maximum number of packets in a batch.
    pub max_packets: usize,

    /// Maximum length of a single packet in bytes.
    pub max_packet_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Generous upper bound for a reassembled batch
            max_batch_bytes: 2 * 1024 * 1024,
            max_packets: 512,
            max_packet_len: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_batch_bytes: 4096,
            max_packets: 8,
            max_packet_len: 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_batch_bytes: usize::MAX,
            max_packets: usize::MAX,
            max_packet_len: usize::MAX,
        }
    }
}
