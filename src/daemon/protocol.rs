//! Daemon protocol — wire format of a changed-sector notification.
//!
//! Each notification is one 16-byte datagram holding two big-endian 64-bit
//! fields, `sector_num` then `nb_sectors`. The producer bit-reflects both
//! fields before sending, so decoding reverses the bit order across the full
//! 64-bit width after the big-endian read. This is not a byte swap.

use serde::Serialize;

/// Exact payload length of an accepted notification.
pub const MESSAGE_LEN: usize = 16;

/// Largest payload read per receive call. Longer datagrams are truncated.
pub const MAX_DATAGRAM: usize = 4096;

/// A contiguous run of sectors that changed on the watched device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SectorRange {
    /// First changed sector
    pub sector_num: u64,
    /// Number of sectors in the run
    pub nb_sectors: u64,
}

impl SectorRange {
    pub fn new(sector_num: u64, nb_sectors: u64) -> Self {
        Self { sector_num, nb_sectors }
    }

    /// Decode a received payload. See [`decode`].
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        decode(payload)
    }

    /// Encode into the on-wire form. See [`encode`].
    pub fn to_payload(&self) -> [u8; MESSAGE_LEN] {
        encode(self)
    }
}

impl std::fmt::Display for SectorRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sector_num: {} nb_sectors: {}", self.sector_num, self.nb_sectors)
    }
}

/// Reverse the order of all 64 bits of `value`.
///
/// Bit 0 becomes bit 63, bit 1 becomes bit 62, and so on. Applying it twice
/// returns the input.
pub fn reflect_bits(value: u64) -> u64 {
    value.reverse_bits()
}

/// Decode one datagram payload into a [`SectorRange`].
///
/// Returns `None` for any payload that is not exactly [`MESSAGE_LEN`] bytes.
/// Short, long and truncated payloads are all treated alike: not a
/// notification.
pub fn decode(payload: &[u8]) -> Option<SectorRange> {
    let bytes: &[u8; MESSAGE_LEN] = payload.try_into().ok()?;

    let (a, b) = bytes.split_at(8);
    let raw_a = u64::from_be_bytes(a.try_into().ok()?);
    let raw_b = u64::from_be_bytes(b.try_into().ok()?);

    Some(SectorRange {
        sector_num: reflect_bits(raw_a),
        nb_sectors: reflect_bits(raw_b),
    })
}

/// Encode a [`SectorRange`] the way the producer puts it on the wire.
///
/// Inverse of [`decode`]: `decode(&encode(r)) == Some(r)`.
pub fn encode(range: &SectorRange) -> [u8; MESSAGE_LEN] {
    let mut out = [0u8; MESSAGE_LEN];
    out[..8].copy_from_slice(&reflect_bits(range.sector_num).to_be_bytes());
    out[8..].copy_from_slice(&reflect_bits(range.nb_sectors).to_be_bytes());
    out
}
