//! Status phase. Layout has been stable for the protocol's whole history:
//! an empty request, a JSON response, and a mirrored ping/pong payload.

use bytes::{BufMut, BytesMut};
use quarry_protocol_core::*;

use crate::{clientbound, serverbound};

const STATUS_REQUEST: i32 = 0x00;
const PING_REQUEST: i32 = 0x01;

const STATUS_RESPONSE: i32 = 0x00;
const PONG_RESPONSE: i32 = 0x01;

pub fn register(catalog: &mut PacketCatalog) {
    let all = VersionRange::since(ProtocolVersion(0));

    catalog.register(serverbound(
        ConnectionState::Status,
        PacketKind::StatusRequest,
        STATUS_REQUEST,
        all,
        decode_status_request,
        encode_status_request,
    ));
    catalog.register(serverbound(
        ConnectionState::Status,
        PacketKind::PingRequest,
        PING_REQUEST,
        all,
        decode_ping_request,
        encode_ping_request,
    ));

    catalog.register(clientbound(
        ConnectionState::Status,
        PacketKind::StatusResponse,
        STATUS_RESPONSE,
        all,
        encode_status_response,
    ));
    catalog.register(clientbound(
        ConnectionState::Status,
        PacketKind::PongResponse,
        PONG_RESPONSE,
        all,
        encode_pong_response,
    ));
}

fn decode_status_request(_: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    Ok(Packet::StatusRequest)
}

fn encode_status_request(_: &Packet, _: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    Ok(())
}

fn decode_ping_request(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let payload = read_i64(data)?;
    Ok(Packet::PingRequest { payload })
}

fn encode_ping_request(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::PingRequest { payload } = packet else {
        unreachable!("catalog dispatched {:?} to the ping encoder", packet.kind())
    };
    buf.put_i64(*payload);
    Ok(())
}

fn encode_status_response(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::StatusResponse { json } = packet else {
        unreachable!("catalog dispatched {:?} to the status encoder", packet.kind())
    };
    write_string(buf, json);
    Ok(())
}

fn encode_pong_response(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::PongResponse { payload } = packet else {
        unreachable!("catalog dispatched {:?} to the pong encoder", packet.kind())
    };
    buf.put_i64(*payload);
    Ok(())
}
