use bytes::BytesMut;

use crate::codec::CodecResult;
use crate::packets::{Packet, PacketKind};
use crate::state::{ConnectionState, Direction};
use crate::version::ProtocolVersion;

/// Decode one wire layout into the canonical representation. The version is
/// the connection's negotiated one, so routines whose range spans a
/// primitive-layout cutover (positions, slots) can pick the right encoding,
/// and newer variants can call an older variant's routine as a shared prefix.
pub type DecodeFn = fn(&mut BytesMut, ProtocolVersion) -> CodecResult<Packet>;

/// Encode the canonical representation into this variant's wire layout.
/// The packet id is written by the catalog, not by the variant.
pub type EncodeFn = fn(&Packet, &mut BytesMut, ProtocolVersion) -> CodecResult<()>;

/// Half-open protocol-version interval `[introduced, superseded)` over which
/// one wire variant is the correct layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub introduced: ProtocolVersion,
    pub superseded: ProtocolVersion,
}

impl VersionRange {
    pub const fn between(introduced: ProtocolVersion, superseded: ProtocolVersion) -> Self {
        Self {
            introduced,
            superseded,
        }
    }

    /// A range with no successor (yet).
    pub const fn since(introduced: ProtocolVersion) -> Self {
        Self {
            introduced,
            superseded: ProtocolVersion::MAX,
        }
    }

    pub fn contains(&self, version: ProtocolVersion) -> bool {
        self.introduced <= version && version < self.superseded
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        self.introduced < other.superseded && other.introduced < self.superseded
    }
}

/// One immutable description of a single packet's wire shape for one version
/// range: id, direction, phase, codec routines. Built once at startup.
#[derive(Debug, Clone, Copy)]
pub struct PacketVariant {
    pub kind: PacketKind,
    pub state: ConnectionState,
    pub direction: Direction,
    /// Valid for this variant's own range only; the same logical packet
    /// carries different ids across versions.
    pub id: i32,
    pub range: VersionRange,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

/// Decode stub for clientbound variants: the server encodes these and the
/// catalog filters decode lookups by direction, so this is never reached.
pub fn decode_clientbound_only(_: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    unreachable!("clientbound variants are never decoded on the server")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_half_open() {
        let r = VersionRange::between(ProtocolVersion(47), ProtocolVersion(107));
        assert!(!r.contains(ProtocolVersion(46)));
        assert!(r.contains(ProtocolVersion(47)));
        assert!(r.contains(ProtocolVersion(106)));
        assert!(!r.contains(ProtocolVersion(107)));
    }

    #[test]
    fn test_overlap() {
        let a = VersionRange::between(ProtocolVersion(0), ProtocolVersion(47));
        let b = VersionRange::since(ProtocolVersion(47));
        let c = VersionRange::between(ProtocolVersion(40), ProtocolVersion(50));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
