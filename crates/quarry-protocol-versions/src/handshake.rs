//! Handshaking phase. One packet, one layout, stable since the id space was
//! introduced.

use bytes::{BufMut, BytesMut};
use quarry_protocol_core::*;

use crate::serverbound;

const HANDSHAKE: i32 = 0x00;

pub fn register(catalog: &mut PacketCatalog) {
    catalog.register(serverbound(
        ConnectionState::Handshaking,
        PacketKind::Handshake,
        HANDSHAKE,
        VersionRange::since(ProtocolVersion(0)),
        decode_handshake,
        encode_handshake,
    ));
}

fn decode_handshake(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let protocol_version = read_varint(data)?;
    let server_address = read_string(data, 255)?;
    let server_port = read_u16(data)?;
    let next_state = read_varint(data)?;
    if ConnectionState::from_handshake_next(next_state).is_none() {
        return Err(CodecError::InvalidEnumValue {
            what: "handshake next state",
            value: next_state,
        });
    }
    Ok(Packet::Handshake {
        protocol_version,
        server_address,
        server_port,
        next_state,
    })
}

fn encode_handshake(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::Handshake {
        protocol_version,
        server_address,
        server_port,
        next_state,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the handshake encoder", packet.kind())
    };
    write_varint(buf, *protocol_version);
    write_string(buf, server_address);
    buf.put_u16(*server_port);
    write_varint(buf, *next_state);
    Ok(())
}
