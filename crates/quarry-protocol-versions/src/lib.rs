//! The wire-variant catalog: every supported packet layout, keyed by phase,
//! direction, wire id, and protocol-version range.
//!
//! Each phase module holds its wire-id constants, the per-range decode and
//! encode routines, and a `register` function. Variants that extend an older
//! layout with trailing fields call the older routine as a plain function
//! and then read the appended fields.

use quarry_protocol_core::{
    decode_clientbound_only, ConnectionState, DecodeFn, Direction, EncodeFn, PacketCatalog,
    PacketKind, PacketVariant, VersionRange,
};

pub mod config;
pub mod handshake;
pub mod login;
pub mod play;
pub mod status;

/// Assemble the full catalog. Called once at startup; the result is shared
/// read-only across connections.
pub fn build_catalog() -> PacketCatalog {
    let mut catalog = PacketCatalog::new();
    handshake::register(&mut catalog);
    status::register(&mut catalog);
    login::register(&mut catalog);
    config::register(&mut catalog);
    play::register(&mut catalog);
    catalog.log_summary();
    catalog
}

pub(crate) fn serverbound(
    state: ConnectionState,
    kind: PacketKind,
    id: i32,
    range: VersionRange,
    decode: DecodeFn,
    encode: EncodeFn,
) -> PacketVariant {
    PacketVariant {
        kind,
        state,
        direction: Direction::ClientToServer,
        id,
        range,
        decode,
        encode,
    }
}

pub(crate) fn clientbound(
    state: ConnectionState,
    kind: PacketKind,
    id: i32,
    range: VersionRange,
    encode: EncodeFn,
) -> PacketVariant {
    PacketVariant {
        kind,
        state,
        direction: Direction::ServerToClient,
        id,
        range,
        decode: decode_clientbound_only,
        encode,
    }
}
