//! Login phase. The ids have been stable here for the protocol's whole
//! history; it is the *layouts* that churned: the login-start shape changed
//! three times around chat signing, the success packet switched from string
//! uuids to raw ones, and the pre-1.8 byte arrays carry short prefixes.

use bytes::{BufMut, BytesMut};
use quarry_protocol_core::*;
use uuid::Uuid;

use crate::{clientbound, serverbound};

// Serverbound
const LOGIN_START: i32 = 0x00;
const ENCRYPTION_RESPONSE: i32 = 0x01;
const LOGIN_ACKNOWLEDGED: i32 = 0x03;

// Clientbound
const LOGIN_DISCONNECT: i32 = 0x00;
const ENCRYPTION_REQUEST: i32 = 0x01;
const LOGIN_SUCCESS: i32 = 0x02;
const SET_COMPRESSION: i32 = 0x03;

pub fn register(catalog: &mut PacketCatalog) {
    use ConnectionState::Login;
    use PacketKind as K;
    use ProtocolVersion as V;

    // Login Start: name only, then the 1.19 signature-era shape, then an
    // optional uuid, then a mandatory one.
    catalog.register(serverbound(
        Login,
        K::LoginStart,
        LOGIN_START,
        VersionRange::between(V(0), V::V1_19),
        decode_login_start_legacy,
        encode_login_start_legacy,
    ));
    catalog.register(serverbound(
        Login,
        K::LoginStart,
        LOGIN_START,
        VersionRange::between(V::V1_19, V::V1_19_3),
        decode_login_start_v1_19,
        encode_login_start_v1_19,
    ));
    catalog.register(serverbound(
        Login,
        K::LoginStart,
        LOGIN_START,
        VersionRange::between(V::V1_19_3, V::V1_20_2),
        decode_login_start_v1_19_3,
        encode_login_start_v1_19_3,
    ));
    catalog.register(serverbound(
        Login,
        K::LoginStart,
        LOGIN_START,
        VersionRange::since(V::V1_20_2),
        decode_login_start_v1_20_2,
        encode_login_start_v1_20_2,
    ));

    catalog.register(serverbound(
        Login,
        K::EncryptionResponse,
        ENCRYPTION_RESPONSE,
        VersionRange::between(V(0), V::V1_8),
        decode_encryption_response_legacy,
        encode_encryption_response_legacy,
    ));
    catalog.register(serverbound(
        Login,
        K::EncryptionResponse,
        ENCRYPTION_RESPONSE,
        VersionRange::between(V::V1_8, V::V1_19),
        decode_encryption_response,
        encode_encryption_response,
    ));
    // 1.19-1.19.2 interleave a salted signature here; those clients are not
    // offered encryption. The plain shape returned in 1.19.3.
    catalog.register(serverbound(
        Login,
        K::EncryptionResponse,
        ENCRYPTION_RESPONSE,
        VersionRange::since(V::V1_19_3),
        decode_encryption_response,
        encode_encryption_response,
    ));

    catalog.register(serverbound(
        Login,
        K::LoginAcknowledged,
        LOGIN_ACKNOWLEDGED,
        VersionRange::since(V::V1_20_2),
        decode_login_acknowledged,
        encode_login_acknowledged,
    ));

    catalog.register(clientbound(
        Login,
        K::Disconnect,
        LOGIN_DISCONNECT,
        VersionRange::since(V(0)),
        encode_login_disconnect,
    ));

    catalog.register(clientbound(
        Login,
        K::EncryptionRequest,
        ENCRYPTION_REQUEST,
        VersionRange::between(V(0), V::V1_8),
        encode_encryption_request_legacy,
    ));
    catalog.register(clientbound(
        Login,
        K::EncryptionRequest,
        ENCRYPTION_REQUEST,
        VersionRange::between(V::V1_8, V::V1_20_5),
        encode_encryption_request,
    ));
    catalog.register(clientbound(
        Login,
        K::EncryptionRequest,
        ENCRYPTION_REQUEST,
        VersionRange::since(V::V1_20_5),
        encode_encryption_request_v1_20_5,
    ));

    catalog.register(clientbound(
        Login,
        K::LoginSuccess,
        LOGIN_SUCCESS,
        VersionRange::between(V(0), V::V1_16),
        encode_login_success_legacy,
    ));
    catalog.register(clientbound(
        Login,
        K::LoginSuccess,
        LOGIN_SUCCESS,
        VersionRange::between(V::V1_16, V::V1_19),
        encode_login_success_v1_16,
    ));
    catalog.register(clientbound(
        Login,
        K::LoginSuccess,
        LOGIN_SUCCESS,
        VersionRange::between(V::V1_19, V::V1_20_5),
        encode_login_success_v1_19,
    ));
    // The strict-error-handling flag existed for exactly two releases.
    catalog.register(clientbound(
        Login,
        K::LoginSuccess,
        LOGIN_SUCCESS,
        VersionRange::between(V::V1_20_5, V::V1_21_2),
        encode_login_success_v1_20_5,
    ));
    catalog.register(clientbound(
        Login,
        K::LoginSuccess,
        LOGIN_SUCCESS,
        VersionRange::since(V::V1_21_2),
        encode_login_success_v1_19,
    ));

    catalog.register(clientbound(
        Login,
        K::SetCompression,
        SET_COMPRESSION,
        VersionRange::since(V::V1_8),
        encode_set_compression,
    ));
}

// === Login Start ===

fn decode_login_start_legacy(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let name = read_string(data, 16)?;
    Ok(Packet::LoginStart { name, uuid: None })
}

fn encode_login_start_legacy(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginStart { name, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the login-start encoder", packet.kind())
    };
    write_string(buf, name);
    Ok(())
}

/// 1.19-1.19.2: name, optional signature data (consumed, not retained),
/// optional uuid.
fn decode_login_start_v1_19(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let Packet::LoginStart { name, .. } = decode_login_start_legacy(data, version)? else {
        unreachable!()
    };
    if read_bool(data)? {
        let _expires_at = read_i64(data)?;
        let _public_key = read_byte_array(data)?;
        let _signature = read_byte_array(data)?;
    }
    let uuid = if read_bool(data)? {
        Some(read_uuid(data)?)
    } else {
        None
    };
    Ok(Packet::LoginStart { name, uuid })
}

fn encode_login_start_v1_19(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginStart { uuid, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the login-start encoder", packet.kind())
    };
    encode_login_start_legacy(packet, buf, version)?;
    buf.put_u8(0); // no signature data
    match uuid {
        Some(uuid) => {
            buf.put_u8(1);
            write_uuid(buf, uuid);
        }
        None => buf.put_u8(0),
    }
    Ok(())
}

/// 1.19.3-1.20.1: name, optional uuid.
fn decode_login_start_v1_19_3(
    data: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<Packet> {
    let Packet::LoginStart { name, .. } = decode_login_start_legacy(data, version)? else {
        unreachable!()
    };
    let uuid = if read_bool(data)? {
        Some(read_uuid(data)?)
    } else {
        None
    };
    Ok(Packet::LoginStart { name, uuid })
}

fn encode_login_start_v1_19_3(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginStart { uuid, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the login-start encoder", packet.kind())
    };
    encode_login_start_legacy(packet, buf, version)?;
    match uuid {
        Some(uuid) => {
            buf.put_u8(1);
            write_uuid(buf, uuid);
        }
        None => buf.put_u8(0),
    }
    Ok(())
}

/// 1.20.2+: name, uuid (mandatory).
fn decode_login_start_v1_20_2(
    data: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<Packet> {
    let Packet::LoginStart { name, .. } = decode_login_start_legacy(data, version)? else {
        unreachable!()
    };
    let uuid = read_uuid(data)?;
    Ok(Packet::LoginStart {
        name,
        uuid: Some(uuid),
    })
}

fn encode_login_start_v1_20_2(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginStart { uuid, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the login-start encoder", packet.kind())
    };
    encode_login_start_legacy(packet, buf, version)?;
    write_uuid(buf, &uuid.unwrap_or_else(Uuid::nil));
    Ok(())
}

// === Encryption Response ===

fn decode_encryption_response_legacy(
    data: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<Packet> {
    let shared_secret = read_byte_array_short(data)?;
    let verify_token = read_byte_array_short(data)?;
    Ok(Packet::EncryptionResponse {
        shared_secret,
        verify_token,
    })
}

fn encode_encryption_response_legacy(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::EncryptionResponse {
        shared_secret,
        verify_token,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the encryption encoder", packet.kind())
    };
    write_byte_array_short(buf, shared_secret);
    write_byte_array_short(buf, verify_token);
    Ok(())
}

fn decode_encryption_response(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let shared_secret = read_byte_array(data)?;
    let verify_token = read_byte_array(data)?;
    Ok(Packet::EncryptionResponse {
        shared_secret,
        verify_token,
    })
}

fn encode_encryption_response(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::EncryptionResponse {
        shared_secret,
        verify_token,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the encryption encoder", packet.kind())
    };
    write_byte_array(buf, shared_secret);
    write_byte_array(buf, verify_token);
    Ok(())
}

// === Login Acknowledged ===

fn decode_login_acknowledged(_: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    Ok(Packet::LoginAcknowledged)
}

fn encode_login_acknowledged(_: &Packet, _: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    Ok(())
}

// === Clientbound ===

fn encode_login_disconnect(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::Disconnect { reason } = packet else {
        unreachable!("catalog dispatched {:?} to the disconnect encoder", packet.kind())
    };
    // Login disconnect stayed JSON even after Play switched to NBT.
    write_string(buf, &reason.to_json());
    Ok(())
}

fn encode_encryption_request_legacy(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::EncryptionRequest {
        server_id,
        public_key,
        verify_token,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the encryption encoder", packet.kind())
    };
    write_string(buf, server_id);
    write_byte_array_short(buf, public_key);
    write_byte_array_short(buf, verify_token);
    Ok(())
}

fn encode_encryption_request(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::EncryptionRequest {
        server_id,
        public_key,
        verify_token,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the encryption encoder", packet.kind())
    };
    write_string(buf, server_id);
    write_byte_array(buf, public_key);
    write_byte_array(buf, verify_token);
    Ok(())
}

fn encode_encryption_request_v1_20_5(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    encode_encryption_request(packet, buf, version)?;
    buf.put_u8(1); // should authenticate = true
    Ok(())
}

fn encode_login_success_legacy(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginSuccess { profile } = packet else {
        unreachable!("catalog dispatched {:?} to the login-success encoder", packet.kind())
    };
    write_string(buf, &profile.uuid.hyphenated().to_string());
    write_string(buf, &profile.name);
    Ok(())
}

fn encode_login_success_v1_16(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginSuccess { profile } = packet else {
        unreachable!("catalog dispatched {:?} to the login-success encoder", packet.kind())
    };
    write_uuid(buf, &profile.uuid);
    write_string(buf, &profile.name);
    Ok(())
}

fn encode_login_success_v1_19(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::LoginSuccess { profile } = packet else {
        unreachable!("catalog dispatched {:?} to the login-success encoder", packet.kind())
    };
    encode_login_success_v1_16(packet, buf, version)?;
    write_varint(buf, profile.properties.len() as i32);
    for prop in &profile.properties {
        write_string(buf, &prop.name);
        write_string(buf, &prop.value);
        if let Some(ref sig) = prop.signature {
            buf.put_u8(1);
            write_string(buf, sig);
        } else {
            buf.put_u8(0);
        }
    }
    Ok(())
}

fn encode_login_success_v1_20_5(
    packet: &Packet,
    buf: &mut BytesMut,
    version: ProtocolVersion,
) -> CodecResult<()> {
    encode_login_success_v1_19(packet, buf, version)?;
    buf.put_u8(0); // strict error handling = false
    Ok(())
}

fn encode_set_compression(
    packet: &Packet,
    buf: &mut BytesMut,
    _: ProtocolVersion,
) -> CodecResult<()> {
    let Packet::SetCompression { threshold } = packet else {
        unreachable!("catalog dispatched {:?} to the compression encoder", packet.kind())
    };
    write_varint(buf, *threshold);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_catalog;
    use quarry_types::{GameProfile, ProfileProperty};

    fn decode_login_start_at(catalog: &PacketCatalog, version: i32, data: &mut BytesMut) -> Packet {
        match catalog
            .decode_packet(
                ConnectionState::Login,
                Direction::ClientToServer,
                ProtocolVersion(version),
                LOGIN_START,
                data,
            )
            .unwrap()
        {
            Decoded::Packet(p) => p,
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_login_start_shapes_across_versions() {
        let catalog = build_catalog();
        let uuid = Uuid::from_u128(0x1234_5678_9ABC_DEF0_1234_5678_9ABC_DEF0);

        // Pre-1.19: bare name. A trailing uuid would simply be frame residue.
        let mut data = BytesMut::new();
        write_string(&mut data, "Steve");
        match decode_login_start_at(&catalog, 47, &mut data) {
            Packet::LoginStart { name, uuid } => {
                assert_eq!(name, "Steve");
                assert_eq!(uuid, None);
            }
            other => panic!("unexpected packet: {:?}", other),
        }

        // 1.19: optional signature data, optional uuid.
        let mut data = BytesMut::new();
        write_string(&mut data, "Alex");
        data.put_u8(0); // no signature
        data.put_u8(1);
        write_uuid(&mut data, &uuid);
        match decode_login_start_at(&catalog, 759, &mut data) {
            Packet::LoginStart { name, uuid: got } => {
                assert_eq!(name, "Alex");
                assert_eq!(got, Some(uuid));
            }
            other => panic!("unexpected packet: {:?}", other),
        }
        assert!(data.is_empty());

        // 1.19.3: the signature block is gone, the uuid still optional.
        let mut data = BytesMut::new();
        write_string(&mut data, "Alex");
        data.put_u8(1);
        write_uuid(&mut data, &uuid);
        match decode_login_start_at(&catalog, 761, &mut data) {
            Packet::LoginStart { name, uuid: got } => {
                assert_eq!(name, "Alex");
                assert_eq!(got, Some(uuid));
            }
            other => panic!("unexpected packet: {:?}", other),
        }
        assert!(data.is_empty());

        // 1.20.2+: mandatory uuid.
        let mut data = BytesMut::new();
        write_string(&mut data, "Alex");
        write_uuid(&mut data, &uuid);
        match decode_login_start_at(&catalog, 767, &mut data) {
            Packet::LoginStart { uuid: got, .. } => assert_eq!(got, Some(uuid)),
            other => panic!("unexpected packet: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_encryption_response_prefix_generations() {
        let catalog = build_catalog();
        let pkt = Packet::EncryptionResponse {
            shared_secret: vec![1; 16],
            verify_token: vec![2; 4],
        };

        // Pre-1.8 uses i16 length prefixes.
        let mut bytes = catalog
            .encode_packet(
                ConnectionState::Login,
                Direction::ClientToServer,
                ProtocolVersion::V1_7_2,
                &pkt,
            )
            .unwrap();
        assert_eq!(read_varint(&mut bytes).unwrap(), ENCRYPTION_RESPONSE);
        assert_eq!(read_i16(&mut bytes).unwrap(), 16);

        // 1.8+ uses varint prefixes.
        let mut bytes = catalog
            .encode_packet(
                ConnectionState::Login,
                Direction::ClientToServer,
                ProtocolVersion::V1_8,
                &pkt,
            )
            .unwrap();
        assert_eq!(read_varint(&mut bytes).unwrap(), ENCRYPTION_RESPONSE);
        assert_eq!(read_varint(&mut bytes).unwrap(), 16);
    }

    #[test]
    fn test_login_success_layouts() {
        let catalog = build_catalog();
        let pkt = Packet::LoginSuccess {
            profile: GameProfile {
                uuid: Uuid::from_u128(7),
                name: "Steve".into(),
                properties: vec![ProfileProperty {
                    name: "textures".into(),
                    value: "e30=".into(),
                    signature: None,
                }],
            },
        };
        let encode_at = |v: ProtocolVersion| {
            catalog
                .encode_packet(ConnectionState::Login, Direction::ServerToClient, v, &pkt)
                .unwrap()
        };

        // Pre-1.16: hyphenated string uuid.
        let mut bytes = encode_at(ProtocolVersion::V1_8);
        assert_eq!(read_varint(&mut bytes).unwrap(), LOGIN_SUCCESS);
        let uuid_str = read_string(&mut bytes, 36).unwrap();
        assert_eq!(uuid_str, Uuid::from_u128(7).hyphenated().to_string());

        // 1.16: raw uuid, no properties yet.
        let mut bytes = encode_at(ProtocolVersion::V1_16);
        read_varint(&mut bytes).unwrap();
        assert_eq!(read_uuid(&mut bytes).unwrap(), Uuid::from_u128(7));
        read_string(&mut bytes, 16).unwrap();
        assert!(bytes.is_empty());

        // 1.20.5: trailing strict-error-handling flag.
        let mut bytes = encode_at(ProtocolVersion::V1_20_5);
        assert_eq!(bytes[bytes.len() - 1], 0);
        read_varint(&mut bytes).unwrap();

        // 1.21.2 dropped the flag again: one byte shorter.
        let with_flag = encode_at(ProtocolVersion::V1_21).len();
        let without_flag = encode_at(ProtocolVersion::V1_21_2).len();
        assert_eq!(with_flag, without_flag + 1);
    }
}
