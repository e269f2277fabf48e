/// A negotiated protocol version number.
///
/// Totally ordered; the ordering decides which wire variant of a packet
/// applies and which connection phases exist at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion(pub i32);

impl ProtocolVersion {
    // Named release versions the catalog keys its ranges on.
    pub const V1_7_2: ProtocolVersion = ProtocolVersion(4);
    pub const V1_7_6: ProtocolVersion = ProtocolVersion(5);
    pub const V1_8: ProtocolVersion = ProtocolVersion(47);
    pub const V1_9: ProtocolVersion = ProtocolVersion(107);
    pub const V1_9_1: ProtocolVersion = ProtocolVersion(108);
    pub const V1_9_2: ProtocolVersion = ProtocolVersion(109);
    pub const V1_12_2: ProtocolVersion = ProtocolVersion(340);
    pub const V1_13: ProtocolVersion = ProtocolVersion(393);
    pub const V1_13_2: ProtocolVersion = ProtocolVersion(404);
    pub const V1_14: ProtocolVersion = ProtocolVersion(477);
    pub const V1_15: ProtocolVersion = ProtocolVersion(573);
    pub const V1_16: ProtocolVersion = ProtocolVersion(735);
    pub const V1_17: ProtocolVersion = ProtocolVersion(755);
    pub const V1_18: ProtocolVersion = ProtocolVersion(757);
    pub const V1_19: ProtocolVersion = ProtocolVersion(759);
    pub const V1_19_3: ProtocolVersion = ProtocolVersion(761);
    pub const V1_20_2: ProtocolVersion = ProtocolVersion(764);
    pub const V1_20_3: ProtocolVersion = ProtocolVersion(765);
    pub const V1_20_5: ProtocolVersion = ProtocolVersion(766);
    pub const V1_21: ProtocolVersion = ProtocolVersion(767);
    pub const V1_21_2: ProtocolVersion = ProtocolVersion(768);

    /// Sentinel upper bound for open-ended variant ranges.
    pub const MAX: ProtocolVersion = ProtocolVersion(i32::MAX);

    /// The Configuration phase was introduced in 1.20.2; older connections
    /// go straight from Login to Play.
    pub fn has_configuration_phase(self) -> bool {
        self >= Self::V1_20_2
    }

    /// 1.14 reordered the packed block-position bitfields (x/z/y instead of
    /// x/y/z) together with the chunk-addressing overhaul.
    pub fn modern_block_position(self) -> bool {
        self >= Self::V1_14
    }

    /// 1.8 replaced the presence-byte item stub with the -1-sentinel one.
    pub fn modern_slot(self) -> bool {
        self >= Self::V1_8
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProtocolVersion {
    fn from(v: i32) -> Self {
        ProtocolVersion(v)
    }
}
