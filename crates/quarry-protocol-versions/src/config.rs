//! Configuration phase, which exists only for protocol 764 (1.20.2) and
//! later. 1.20.5 inserted a cookie packet into both id spaces, shifting the
//! finish/registry ids up — the only id churn this young phase has seen.

use bytes::{BufMut, BytesMut};
use quarry_nbt::{nbt_compound, NbtValue};
use quarry_protocol_core::*;

use crate::{clientbound, serverbound};

// Serverbound
const CLIENT_INFORMATION: i32 = 0x00;
const FINISH_CONFIG_ACK_V764: i32 = 0x02;
const FINISH_CONFIG_ACK_V766: i32 = 0x03;
const KNOWN_PACKS_RESPONSE: i32 = 0x07;

// Clientbound
const CONFIG_DISCONNECT_V764: i32 = 0x01;
const CONFIG_DISCONNECT_V766: i32 = 0x02;
const FINISH_CONFIG_V764: i32 = 0x02;
const FINISH_CONFIG_V766: i32 = 0x03;
const REGISTRY_DATA_V764: i32 = 0x05;
const REGISTRY_DATA_V766: i32 = 0x07;
const KNOWN_PACKS_REQUEST: i32 = 0x0E;

pub fn register(catalog: &mut PacketCatalog) {
    use ConnectionState::Configuration;
    use PacketKind as K;
    use ProtocolVersion as V;

    let v764 = VersionRange::between(V::V1_20_2, V::V1_20_5);
    let v766 = VersionRange::since(V::V1_20_5);
    let all = VersionRange::since(V::V1_20_2);

    catalog.register(serverbound(
        Configuration,
        K::ClientInformation,
        CLIENT_INFORMATION,
        all,
        decode_client_information_modern,
        encode_client_information_modern,
    ));
    catalog.register(serverbound(
        Configuration,
        K::FinishConfigurationAck,
        FINISH_CONFIG_ACK_V764,
        v764,
        decode_finish_ack,
        encode_empty,
    ));
    catalog.register(serverbound(
        Configuration,
        K::FinishConfigurationAck,
        FINISH_CONFIG_ACK_V766,
        v766,
        decode_finish_ack,
        encode_empty,
    ));
    catalog.register(serverbound(
        Configuration,
        K::KnownPacksResponse,
        KNOWN_PACKS_RESPONSE,
        v766,
        decode_known_packs_response,
        encode_known_packs,
    ));

    catalog.register(clientbound(
        Configuration,
        K::Disconnect,
        CONFIG_DISCONNECT_V764,
        v764,
        encode_config_disconnect,
    ));
    catalog.register(clientbound(
        Configuration,
        K::Disconnect,
        CONFIG_DISCONNECT_V766,
        v766,
        encode_config_disconnect,
    ));
    catalog.register(clientbound(
        Configuration,
        K::FinishConfiguration,
        FINISH_CONFIG_V764,
        v764,
        encode_empty,
    ));
    catalog.register(clientbound(
        Configuration,
        K::FinishConfiguration,
        FINISH_CONFIG_V766,
        v766,
        encode_empty,
    ));
    catalog.register(clientbound(
        Configuration,
        K::RegistryData,
        REGISTRY_DATA_V764,
        v764,
        encode_registry_data_v764,
    ));
    catalog.register(clientbound(
        Configuration,
        K::RegistryData,
        REGISTRY_DATA_V766,
        v766,
        encode_registry_data,
    ));
    catalog.register(clientbound(
        Configuration,
        K::KnownPacksRequest,
        KNOWN_PACKS_REQUEST,
        v766,
        encode_known_packs,
    ));
}

/// The full modern client-information layout. Shared with the Play phase,
/// where the same packet can be re-sent after configuration ends.
pub(crate) fn decode_client_information_modern(
    data: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<Packet> {
    let locale = read_string(data, 16)?;
    let view_distance = read_i8(data)?;
    let chat_mode = read_varint(data)?;
    if !(0..=2).contains(&chat_mode) {
        return Err(CodecError::InvalidEnumValue {
            what: "chat mode",
            value: chat_mode,
        });
    }
    let chat_colors = read_bool(data)?;
    let skin_parts = read_u8(data)?;
    let main_hand = read_varint(data)?;
    let text_filtering = read_bool(data)?;
    let allow_listing = read_bool(data)?;
    Ok(Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        main_hand,
        text_filtering,
        allow_listing,
    })
}

pub(crate) fn encode_client_information_modern(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        main_hand,
        text_filtering,
        allow_listing,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the client-information encoder", packet.kind())
    };
    write_string(buf, locale);
    buf.put_i8(*view_distance);
    write_varint(buf, *chat_mode);
    buf.put_u8(*chat_colors as u8);
    buf.put_u8(*skin_parts);
    write_varint(buf, *main_hand);
    buf.put_u8(*text_filtering as u8);
    buf.put_u8(*allow_listing as u8);
    Ok(())
}

fn decode_finish_ack(_: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    Ok(Packet::FinishConfigurationAck)
}

fn encode_empty(_: &Packet, _: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    Ok(())
}

fn decode_known_packs_response(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let count = read_varint(data)? as usize;
    let mut packs = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let namespace = read_string(data, 32767)?;
        let id = read_string(data, 32767)?;
        let version = read_string(data, 32767)?;
        packs.push(KnownPack {
            namespace,
            id,
            version,
        });
    }
    Ok(Packet::KnownPacksResponse { packs })
}

/// Request and response share one wire shape.
fn encode_known_packs(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let packs = match packet {
        Packet::KnownPacksRequest { packs } => packs,
        Packet::KnownPacksResponse { packs } => packs,
        other => {
            unreachable!("catalog dispatched {:?} to the known-packs encoder", other.kind())
        }
    };
    write_varint(buf, packs.len() as i32);
    for pack in packs {
        write_string(buf, &pack.namespace);
        write_string(buf, &pack.id);
        write_string(buf, &pack.version);
    }
    Ok(())
}

/// 1.20.2-1.20.4 carry registry data as one network-NBT compound: the
/// registry's key maps to a compound with its "type" and a "value" list of
/// name/id/element entries. 1.20.5 flattened this into the id-plus-entries
/// layout below.
fn encode_registry_data_v764(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::RegistryData {
        registry_id,
        entries,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the registry encoder", packet.kind())
    };
    let values = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut fields = vec![
                ("name".into(), NbtValue::String(entry.id.clone())),
                ("id".into(), NbtValue::Int(index as i32)),
            ];
            if let Some(data) = &entry.data {
                fields.push(("element".into(), data.clone()));
            }
            NbtValue::Compound(fields)
        })
        .collect();
    let root = nbt_compound! {
        registry_id.clone() => nbt_compound! {
            "type" => NbtValue::String(registry_id.clone()),
            "value" => NbtValue::List(values),
        },
    };
    root.write_root_network(buf);
    Ok(())
}

fn encode_registry_data(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::RegistryData {
        registry_id,
        entries,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the registry encoder", packet.kind())
    };
    write_string(buf, registry_id);
    write_varint(buf, entries.len() as i32);
    for entry in entries {
        write_string(buf, &entry.id);
        match &entry.data {
            Some(nbt) => {
                buf.put_u8(1);
                nbt.write_root_network(buf);
            }
            None => buf.put_u8(0),
        }
    }
    Ok(())
}

fn encode_config_disconnect(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::Disconnect { reason } = packet else {
        unreachable!("catalog dispatched {:?} to the disconnect encoder", packet.kind())
    };
    // Configuration disconnect reasons are network-NBT text components.
    let nbt = NbtValue::Compound(vec![("text".into(), NbtValue::String(reason.text.clone()))]);
    nbt.write_root_network(buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_catalog;

    #[test]
    fn test_finish_ack_id_shifted_in_1_20_5() {
        let catalog = build_catalog();
        // 0x02 is the ack at 764...
        let r = catalog.resolve(
            ConnectionState::Configuration,
            Direction::ClientToServer,
            ProtocolVersion::V1_20_2,
            0x02,
        );
        assert!(matches!(
            r,
            Resolution::Variant(v) if v.kind == PacketKind::FinishConfigurationAck
        ));
        // ...but unregistered at 766, where the ack moved to 0x03.
        let r = catalog.resolve(
            ConnectionState::Configuration,
            Direction::ClientToServer,
            ProtocolVersion::V1_20_5,
            0x02,
        );
        assert!(matches!(r, Resolution::Unregistered));
        let r = catalog.resolve(
            ConnectionState::Configuration,
            Direction::ClientToServer,
            ProtocolVersion::V1_20_5,
            0x03,
        );
        assert!(matches!(
            r,
            Resolution::Variant(v) if v.kind == PacketKind::FinishConfigurationAck
        ));
    }

    #[test]
    fn test_client_information_roundtrip() {
        let catalog = build_catalog();
        let pkt = Packet::ClientInformation {
            locale: "en_US".into(),
            view_distance: 12,
            chat_mode: 0,
            chat_colors: true,
            skin_parts: 0x7F,
            main_hand: 1,
            text_filtering: false,
            allow_listing: true,
        };
        let mut bytes = catalog
            .encode_packet(
                ConnectionState::Configuration,
                Direction::ClientToServer,
                ProtocolVersion::V1_21,
                &pkt,
            )
            .unwrap();
        let id = read_varint(&mut bytes).unwrap();
        assert_eq!(id, CLIENT_INFORMATION);
        match catalog
            .decode_packet(
                ConnectionState::Configuration,
                Direction::ClientToServer,
                ProtocolVersion::V1_21,
                id,
                &mut bytes,
            )
            .unwrap()
        {
            Decoded::Packet(Packet::ClientInformation {
                locale,
                view_distance,
                skin_parts,
                ..
            }) => {
                assert_eq!(locale, "en_US");
                assert_eq!(view_distance, 12);
                assert_eq!(skin_parts, 0x7F);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_invalid_chat_mode_is_rejected() {
        let mut data = BytesMut::new();
        write_string(&mut data, "en_US");
        data.put_i8(10);
        write_varint(&mut data, 7); // chat mode out of range
        assert!(matches!(
            decode_client_information_modern(&mut data, ProtocolVersion::V1_21),
            Err(CodecError::InvalidEnumValue { value: 7, .. })
        ));
    }

    #[test]
    fn test_registry_data_shape_per_version() {
        let catalog = build_catalog();
        let pkt = Packet::RegistryData {
            registry_id: "minecraft:dimension_type".into(),
            entries: vec![RegistryEntry {
                id: "minecraft:overworld".into(),
                data: Some(nbt_compound! {
                    "height" => NbtValue::Int(384),
                }),
            }],
        };
        let encode_at = |v: ProtocolVersion| {
            catalog
                .encode_packet(
                    ConnectionState::Configuration,
                    Direction::ServerToClient,
                    v,
                    &pkt,
                )
                .unwrap()
        };

        // 1.20.2: one network-NBT compound, nothing before it.
        let mut bytes = encode_at(ProtocolVersion::V1_20_2);
        assert_eq!(read_varint(&mut bytes).unwrap(), REGISTRY_DATA_V764);
        assert_eq!(bytes[0], quarry_nbt::TAG_COMPOUND);

        // 1.20.5: flat registry id followed by the entry list.
        let mut bytes = encode_at(ProtocolVersion::V1_20_5);
        assert_eq!(read_varint(&mut bytes).unwrap(), REGISTRY_DATA_V766);
        assert_eq!(
            read_string(&mut bytes, 32767).unwrap(),
            "minecraft:dimension_type"
        );
    }
}
