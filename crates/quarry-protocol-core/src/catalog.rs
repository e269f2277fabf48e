use std::collections::HashMap;

use anyhow::{bail, Result};
use bytes::BytesMut;
use tracing::{debug, trace};

use crate::codec::{write_varint, CodecResult};
use crate::packets::{Packet, PacketKind};
use crate::state::{ConnectionState, Direction};
use crate::variant::PacketVariant;
use crate::version::ProtocolVersion;

/// Outcome of resolving a wire id against the catalog.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Variant(&'a PacketVariant),
    /// No variant covers this (phase, direction, version, id). Deliberately
    /// not an error: clients send plenty of packets a server ignores, and
    /// the frame's remaining bytes are simply discarded by the transport.
    Unregistered,
}

/// Outcome of decoding one inbound frame.
#[derive(Debug, Clone)]
pub enum Decoded {
    Packet(Packet),
    /// Unregistered id; the payload was intentionally not consumed.
    Ignored { id: i32 },
}

/// The process-wide table of wire variants.
///
/// Assembled once at startup, read-only afterwards, shared by reference
/// across all connections. Malformed registration (two variants claiming the
/// same id or kind over overlapping ranges in one phase/direction group) is
/// a programming error and panics during assembly.
#[derive(Debug, Default)]
pub struct PacketCatalog {
    groups: HashMap<(ConnectionState, Direction), Vec<PacketVariant>>,
}

impl PacketCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, variant: PacketVariant) {
        let group = self
            .groups
            .entry((variant.state, variant.direction))
            .or_default();
        for existing in group.iter() {
            if existing.range.overlaps(&variant.range) {
                assert!(
                    existing.id != variant.id,
                    "overlapping registration for id 0x{:02X} in {:?}/{:?}: {:?} and {:?}",
                    variant.id,
                    variant.state,
                    variant.direction,
                    existing.range,
                    variant.range,
                );
                assert!(
                    existing.kind != variant.kind,
                    "overlapping registration for kind {:?} in {:?}/{:?}: {:?} and {:?}",
                    variant.kind,
                    variant.state,
                    variant.direction,
                    existing.range,
                    variant.range,
                );
            }
        }
        group.push(variant);
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the variant for an inbound wire id, or Unregistered.
    ///
    /// Overlapping ranges cannot occur by construction; if they somehow did,
    /// the variant with the latest `introduced` wins.
    pub fn resolve(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        id: i32,
    ) -> Resolution<'_> {
        let Some(group) = self.groups.get(&(state, direction)) else {
            return Resolution::Unregistered;
        };
        let best = group
            .iter()
            .filter(|v| v.range.contains(version) && v.id == id)
            .max_by_key(|v| v.range.introduced);
        match best {
            Some(v) => Resolution::Variant(v),
            None => Resolution::Unregistered,
        }
    }

    /// Find the variant to encode a packet kind at the given version.
    pub fn variant_for(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        kind: PacketKind,
    ) -> Option<&PacketVariant> {
        self.groups
            .get(&(state, direction))?
            .iter()
            .filter(|v| v.range.contains(version) && v.kind == kind)
            .max_by_key(|v| v.range.introduced)
    }

    /// Decode one inbound frame payload.
    ///
    /// A registered variant's decode failure is fatal for the connection
    /// (the stream is desynchronized) and propagates unmodified. An
    /// unregistered id is an ignore, never an error. Bytes left in the
    /// window after a successful decode are the transport's to discard.
    pub fn decode_packet(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        id: i32,
        data: &mut BytesMut,
    ) -> CodecResult<Decoded> {
        match self.resolve(state, direction, version, id) {
            Resolution::Variant(variant) => {
                let packet = (variant.decode)(data, version)?;
                Ok(Decoded::Packet(packet))
            }
            Resolution::Unregistered => {
                trace!(
                    "Ignoring unregistered packet id=0x{:02X} in {:?}/{:?} at protocol {}",
                    id,
                    state,
                    direction,
                    version
                );
                Ok(Decoded::Ignored { id })
            }
        }
    }

    /// Encode a packet into its wire layout for the given version, id first.
    /// The caller frames the returned bytes.
    pub fn encode_packet(
        &self,
        state: ConnectionState,
        direction: Direction,
        version: ProtocolVersion,
        packet: &Packet,
    ) -> Result<BytesMut> {
        let Some(variant) = self.variant_for(state, direction, version, packet.kind()) else {
            bail!(
                "Cannot encode {:?} in {:?}/{:?} at protocol {}",
                packet.kind(),
                state,
                direction,
                version
            );
        };
        let mut buf = BytesMut::new();
        write_varint(&mut buf, variant.id);
        (variant.encode)(packet, &mut buf, version)?;
        Ok(buf)
    }

    /// Log a one-line summary after assembly.
    pub fn log_summary(&self) {
        debug!(
            "Packet catalog assembled: {} variants across {} phase/direction groups",
            self.len(),
            self.groups.len()
        );
    }
}
