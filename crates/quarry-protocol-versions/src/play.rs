//! Play phase: the bulk of the catalog and all of the messy history. Wire
//! ids are re-numbered nearly every release, so the registration table below
//! is organized per logical packet with one entry per id/layout epoch.
//! Layout-only cutovers that happened protocol-wide (packed positions at
//! 477, slot stubs at 47) are handled inside the shared codec and do not
//! need an epoch split here; width and field changes do.

use bytes::{Buf, BufMut, BytesMut};
use quarry_nbt::NbtValue;
use quarry_protocol_core::*;

use crate::{clientbound, config, serverbound};

pub fn register(catalog: &mut PacketCatalog) {
    use ConnectionState::Play;
    use PacketKind as K;
    use ProtocolVersion as V;

    let between = VersionRange::between;
    let since = VersionRange::since;

    // --- Keep Alive (serverbound): i32 before 1.8, varint until 1.12.2,
    //     i64 after. The varint-to-i64 widening is invisible in a hexdump of
    //     small ids, which is exactly why it gets its own epochs.
    for (id, range, decode, encode) in [
        (0x00, between(V(0), V::V1_8), decode_keep_alive_int as DecodeFn, encode_keep_alive_int as EncodeFn),
        (0x00, between(V::V1_8, V::V1_9), decode_keep_alive_varint, encode_keep_alive_varint),
        (0x0B, between(V::V1_9, V::V1_12_2), decode_keep_alive_varint, encode_keep_alive_varint),
        (0x0B, between(V::V1_12_2, V::V1_13), decode_keep_alive_long, encode_keep_alive_long),
        (0x0E, between(V::V1_13, V::V1_14), decode_keep_alive_long, encode_keep_alive_long),
        (0x0F, between(V::V1_14, V::V1_19), decode_keep_alive_long, encode_keep_alive_long),
        (0x11, between(V::V1_19, V::V1_20_2), decode_keep_alive_long, encode_keep_alive_long),
        (0x14, between(V::V1_20_2, V::V1_21), decode_keep_alive_long, encode_keep_alive_long),
        (0x18, since(V::V1_21), decode_keep_alive_long, encode_keep_alive_long),
    ] {
        catalog.register(serverbound(Play, K::KeepAliveServerbound, id, range, decode, encode));
    }

    // --- Client Settings: grew a varint chat mode and a main-hand field in
    //     1.9, a text-filtering flag in 1.17, a listing flag in 1.18, and
    //     became the configuration client-information layout in 1.20.2.
    for (id, range, decode, encode) in [
        (0x15, between(V::V1_8, V::V1_9), decode_client_settings_v1_8 as DecodeFn, encode_client_settings_v1_8 as EncodeFn),
        (0x15, between(V::V1_9, V::V1_14), decode_client_settings_v1_9, encode_client_settings_v1_9),
        (0x05, between(V::V1_14, V::V1_17), decode_client_settings_v1_9, encode_client_settings_v1_9),
        (0x05, between(V::V1_17, V::V1_18), decode_client_settings_v1_17, encode_client_settings_v1_17),
        (0x05, between(V::V1_18, V::V1_20_2), decode_client_settings_v1_18, encode_client_settings_v1_18),
        (0x09, between(V::V1_20_2, V::V1_21), config::decode_client_information_modern, config::encode_client_information_modern),
        (0x0A, since(V::V1_21), config::decode_client_information_modern, config::encode_client_information_modern),
    ] {
        catalog.register(serverbound(Play, K::ClientInformation, id, range, decode, encode));
    }

    // --- Chat. Signing-era intermediates (1.19 through 1.20.x) are left
    //     unregistered on purpose; the ids are served as no-ops.
    for (id, range, decode, encode) in [
        (0x01, between(V(0), V::V1_9), decode_chat_legacy as DecodeFn, encode_chat_legacy as EncodeFn),
        (0x02, between(V::V1_9, V::V1_14), decode_chat_legacy, encode_chat_legacy),
        (0x03, between(V::V1_14, V::V1_19), decode_chat_legacy, encode_chat_legacy),
        (0x06, since(V::V1_21), decode_chat_v1_21, encode_chat_v1_21),
    ] {
        catalog.register(serverbound(Play, K::ChatMessage, id, range, decode, encode));
    }

    // --- Movement quartet. Layouts are stable; only ids move.
    let movement_epochs: [(VersionRange, [i32; 4]); 6] = [
        (between(V::V1_8, V::V1_9), [0x04, 0x06, 0x05, 0x03]),
        (between(V::V1_9, V::V1_14), [0x0C, 0x0D, 0x0E, 0x0F]),
        (between(V::V1_14, V::V1_19), [0x11, 0x12, 0x13, 0x14]),
        (between(V::V1_19, V::V1_20_2), [0x13, 0x14, 0x15, 0x16]),
        (between(V::V1_20_2, V::V1_21), [0x16, 0x17, 0x18, 0x19]),
        (since(V::V1_21), [0x1A, 0x1B, 0x1C, 0x1D]),
    ];
    for (range, [pos, pos_rot, rot, on_ground]) in movement_epochs {
        catalog.register(serverbound(Play, K::PlayerPosition, pos, range, decode_player_position, encode_player_position));
        catalog.register(serverbound(Play, K::PlayerPositionAndRotation, pos_rot, range, decode_player_position_rotation, encode_player_position_rotation));
        catalog.register(serverbound(Play, K::PlayerRotation, rot, range, decode_player_rotation, encode_player_rotation));
        catalog.register(serverbound(Play, K::PlayerOnGround, on_ground, range, decode_player_on_ground, encode_player_on_ground));
    }

    // --- Block dig (player action). The status widened to a varint in 1.9,
    //     the position layout flipped at 477 (inside the shared codec), and
    //     1.19 appended a sequence number.
    for (id, range, decode, encode) in [
        (0x07, between(V::V1_8, V::V1_9), decode_block_dig_v1_8 as DecodeFn, encode_block_dig_v1_8 as EncodeFn),
        (0x13, between(V::V1_9, V::V1_14), decode_block_dig_v1_9, encode_block_dig_v1_9),
        (0x1A, between(V::V1_14, V::V1_19), decode_block_dig_v1_9, encode_block_dig_v1_9),
        (0x1C, between(V::V1_19, V::V1_20_2), decode_block_dig_v1_19, encode_block_dig_v1_19),
        (0x21, between(V::V1_20_2, V::V1_21), decode_block_dig_v1_19, encode_block_dig_v1_19),
        (0x24, since(V::V1_21), decode_block_dig_v1_19, encode_block_dig_v1_19),
    ] {
        catalog.register(serverbound(Play, K::BlockDig, id, range, decode, encode));
    }

    // --- Block place / use item on. The 1.8 shape carries the held item
    //     stub inline, which must be skipped to stay frame-aligned.
    catalog.register(serverbound(Play, K::BlockPlace, 0x08, between(V::V1_8, V::V1_9), decode_block_place_v1_8, encode_block_place_v1_8));
    catalog.register(serverbound(Play, K::BlockPlace, 0x38, since(V::V1_21), decode_block_place_v1_21, encode_block_place_v1_21));

    for (id, range) in [
        (0x09, between(V::V1_8, V::V1_9)),
        (0x17, between(V::V1_9, V::V1_14)),
        (0x2F, since(V::V1_21)),
    ] {
        catalog.register(serverbound(Play, K::HeldItemChange, id, range, decode_held_item_change, encode_held_item_change));
    }

    // --- Creative inventory action, registered only while the two supported
    //     slot-stub generations were current (the 1.13 flattening changed
    //     the stub again).
    catalog.register(serverbound(Play, K::CreativeInventoryAction, 0x10, between(V(0), V::V1_9), decode_creative_action, encode_creative_action));
    catalog.register(serverbound(Play, K::CreativeInventoryAction, 0x18, between(V::V1_9, V::V1_13), decode_creative_action, encode_creative_action));

    catalog.register(serverbound(Play, K::ConfirmTeleportation, 0x00, since(V::V1_9), decode_confirm_teleportation, encode_confirm_teleportation));

    // === Clientbound ===

    for (id, range, encode) in [
        (0x00, between(V(0), V::V1_8), encode_keep_alive_int as EncodeFn),
        (0x00, between(V::V1_8, V::V1_9), encode_keep_alive_varint),
        (0x1F, between(V::V1_9, V::V1_12_2), encode_keep_alive_varint),
        (0x1F, between(V::V1_12_2, V::V1_14), encode_keep_alive_long),
        (0x21, between(V::V1_14, V::V1_20_2), encode_keep_alive_long),
        (0x24, between(V::V1_20_2, V::V1_21), encode_keep_alive_long),
        (0x26, since(V::V1_21), encode_keep_alive_long),
    ] {
        catalog.register(clientbound(Play, K::KeepAliveClientbound, id, range, encode));
    }

    // Join game: 1.9 renumbered it, 1.9.1 widened the dimension field, so
    // the i8 revision lived under two ids.
    catalog.register(clientbound(Play, K::JoinGame, 0x01, between(V::V1_8, V::V1_9), encode_join_game_v1_8));
    catalog.register(clientbound(Play, K::JoinGame, 0x23, between(V::V1_9, V::V1_9_1), encode_join_game_v1_8));
    catalog.register(clientbound(Play, K::JoinGame, 0x23, between(V::V1_9_1, V::V1_13), encode_join_game_v1_9_1));
    catalog.register(clientbound(Play, K::JoinGame, 0x25, between(V::V1_13, V::V1_14), encode_join_game_v1_9_1));

    for (id, range, encode) in [
        (0x08, between(V::V1_8, V::V1_9), encode_sync_position_v1_8 as EncodeFn),
        (0x2E, between(V::V1_9, V::V1_12_2), encode_sync_position_v1_9),
        (0x2F, between(V::V1_12_2, V::V1_13), encode_sync_position_v1_9),
        (0x32, between(V::V1_13, V::V1_14), encode_sync_position_v1_9),
        (0x40, since(V::V1_21), encode_sync_position_v1_9),
    ] {
        catalog.register(clientbound(Play, K::SynchronizePlayerPosition, id, range, encode));
    }

    for (id, range, encode) in [
        (0x05, between(V::V1_8, V::V1_9), encode_spawn_position as EncodeFn),
        (0x43, between(V::V1_9, V::V1_12_2), encode_spawn_position),
        (0x46, between(V::V1_12_2, V::V1_13), encode_spawn_position),
        (0x49, between(V::V1_13, V::V1_14), encode_spawn_position),
        (0x4D, between(V::V1_14, V::V1_18), encode_spawn_position),
        (0x4B, between(V::V1_18, V::V1_20_2), encode_spawn_position_v1_18),
        (0x56, since(V::V1_21), encode_spawn_position_v1_18),
    ] {
        catalog.register(clientbound(Play, K::SpawnPosition, id, range, encode));
    }

    catalog.register(clientbound(Play, K::BlockUpdate, 0x23, between(V::V1_8, V::V1_9), encode_block_update));
    catalog.register(clientbound(Play, K::BlockUpdate, 0x0B, between(V::V1_9, V::V1_19), encode_block_update));
    catalog.register(clientbound(Play, K::BlockUpdate, 0x09, since(V::V1_21), encode_block_update));

    // Set slot: one registration spans the slot-generation cutover at 47;
    // the stub generation is selected inside the shared codec.
    catalog.register(clientbound(Play, K::SetContainerSlot, 0x2F, between(V(0), V::V1_9), encode_set_container_slot));
    catalog.register(clientbound(Play, K::SetContainerSlot, 0x16, between(V::V1_9, V::V1_13), encode_set_container_slot));

    for (id, range, encode) in [
        (0x40, between(V::V1_8, V::V1_9), encode_play_disconnect_json as EncodeFn),
        (0x1A, between(V::V1_9, V::V1_15), encode_play_disconnect_json),
        (0x1B, between(V::V1_15, V::V1_16), encode_play_disconnect_json),
        (0x19, between(V::V1_16, V::V1_20_3), encode_play_disconnect_json),
        (0x1D, since(V::V1_20_3), encode_play_disconnect_nbt),
    ] {
        catalog.register(clientbound(Play, K::Disconnect, id, range, encode));
    }

    // In-play compression renegotiation existed only in 1.8.
    catalog.register(clientbound(Play, K::SetCompression, 0x46, between(V::V1_8, V::V1_9), encode_set_compression_play));
}

// === Keep Alive ===

fn decode_keep_alive_int(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let id = read_i32(data)? as i64;
    Ok(Packet::KeepAliveServerbound { id })
}

fn decode_keep_alive_varint(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let id = read_varint(data)? as i64;
    Ok(Packet::KeepAliveServerbound { id })
}

fn decode_keep_alive_long(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let id = read_i64(data)?;
    Ok(Packet::KeepAliveServerbound { id })
}

fn keep_alive_id(packet: &Packet) -> i64 {
    match packet {
        Packet::KeepAliveServerbound { id } | Packet::KeepAliveClientbound { id } => *id,
        other => unreachable!("catalog dispatched {:?} to a keep-alive encoder", other.kind()),
    }
}

fn encode_keep_alive_int(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    buf.put_i32(keep_alive_id(packet) as i32);
    Ok(())
}

fn encode_keep_alive_varint(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    write_varint(buf, keep_alive_id(packet) as i32);
    Ok(())
}

fn encode_keep_alive_long(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    buf.put_i64(keep_alive_id(packet));
    Ok(())
}

// === Client Settings ===

/// Pre-1.9: locale, view distance, single-byte chat mode, colors, skin
/// parts. Fields added later get their documented defaults.
fn decode_client_settings_v1_8(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let locale = read_string(data, 16)?;
    let view_distance = read_i8(data)?;
    let chat_mode = read_i8(data)? as i32;
    let chat_colors = read_bool(data)?;
    let skin_parts = read_u8(data)?;
    Ok(Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        main_hand: 1,
        text_filtering: false,
        allow_listing: true,
    })
}

fn encode_client_settings_v1_8(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the client-settings encoder", packet.kind())
    };
    write_string(buf, locale);
    buf.put_i8(*view_distance);
    buf.put_i8(*chat_mode as i8);
    buf.put_u8(*chat_colors as u8);
    buf.put_u8(*skin_parts);
    Ok(())
}

/// 1.9 widened chat mode to a varint and appended the main-hand varint.
fn decode_client_settings_v1_9(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let locale = read_string(data, 16)?;
    let view_distance = read_i8(data)?;
    let chat_mode = read_varint(data)?;
    let chat_colors = read_bool(data)?;
    let skin_parts = read_u8(data)?;
    let main_hand = read_varint(data)?;
    Ok(Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        main_hand,
        text_filtering: false,
        allow_listing: true,
    })
}

fn encode_client_settings_v1_9(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::ClientInformation {
        locale,
        view_distance,
        chat_mode,
        chat_colors,
        skin_parts,
        main_hand,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the client-settings encoder", packet.kind())
    };
    write_string(buf, locale);
    buf.put_i8(*view_distance);
    write_varint(buf, *chat_mode);
    buf.put_u8(*chat_colors as u8);
    buf.put_u8(*skin_parts);
    write_varint(buf, *main_hand);
    Ok(())
}

/// 1.17 = the 1.9 shape plus a trailing text-filtering flag.
fn decode_client_settings_v1_17(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let mut packet = decode_client_settings_v1_9(data, version)?;
    if let Packet::ClientInformation { text_filtering, .. } = &mut packet {
        *text_filtering = read_bool(data)?;
    }
    Ok(packet)
}

fn encode_client_settings_v1_17(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    encode_client_settings_v1_9(packet, buf, version)?;
    let Packet::ClientInformation { text_filtering, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the client-settings encoder", packet.kind())
    };
    buf.put_u8(*text_filtering as u8);
    Ok(())
}

/// 1.18 = the 1.17 shape plus a trailing allow-listing flag.
fn decode_client_settings_v1_18(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let mut packet = decode_client_settings_v1_17(data, version)?;
    if let Packet::ClientInformation { allow_listing, .. } = &mut packet {
        *allow_listing = read_bool(data)?;
    }
    Ok(packet)
}

fn encode_client_settings_v1_18(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    encode_client_settings_v1_17(packet, buf, version)?;
    let Packet::ClientInformation { allow_listing, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the client-settings encoder", packet.kind())
    };
    buf.put_u8(*allow_listing as u8);
    Ok(())
}

// === Chat ===

fn decode_chat_legacy(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let message = read_string(data, 256)?;
    Ok(Packet::ChatMessage {
        message,
        timestamp: 0,
        salt: 0,
        signature: None,
        offset: 0,
        acknowledged: [0; 3],
    })
}

fn encode_chat_legacy(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::ChatMessage { message, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the chat encoder", packet.kind())
    };
    write_string(buf, message);
    Ok(())
}

/// 1.21 signed chat: fixed 256-byte signature when present, plus the
/// acknowledgment offset and a 20-bit fixed bitset.
fn decode_chat_v1_21(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let message = read_string(data, 256)?;
    let timestamp = read_i64(data)?;
    let salt = read_i64(data)?;
    let signature = if read_bool(data)? {
        if data.remaining() < 256 {
            return Err(CodecError::BufferUnderflow);
        }
        Some(data.split_to(256).to_vec())
    } else {
        None
    };
    let offset = read_varint(data)?;
    if data.remaining() < 3 {
        return Err(CodecError::BufferUnderflow);
    }
    let mut acknowledged = [0u8; 3];
    data.copy_to_slice(&mut acknowledged);
    Ok(Packet::ChatMessage {
        message,
        timestamp,
        salt,
        signature,
        offset,
        acknowledged,
    })
}

fn encode_chat_v1_21(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::ChatMessage {
        message,
        timestamp,
        salt,
        signature,
        offset,
        acknowledged,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the chat encoder", packet.kind())
    };
    write_string(buf, message);
    buf.put_i64(*timestamp);
    buf.put_i64(*salt);
    match signature {
        Some(sig) => {
            buf.put_u8(1);
            buf.put_slice(sig);
        }
        None => buf.put_u8(0),
    }
    write_varint(buf, *offset);
    buf.put_slice(acknowledged);
    Ok(())
}

// === Movement ===

fn decode_player_position(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let x = read_f64(data)?;
    let y = read_f64(data)?;
    let z = read_f64(data)?;
    let on_ground = read_bool(data)?;
    Ok(Packet::PlayerPosition { x, y, z, on_ground })
}

fn encode_player_position(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::PlayerPosition { x, y, z, on_ground } = packet else {
        unreachable!("catalog dispatched {:?} to the movement encoder", packet.kind())
    };
    buf.put_f64(*x);
    buf.put_f64(*y);
    buf.put_f64(*z);
    buf.put_u8(*on_ground as u8);
    Ok(())
}

fn decode_player_position_rotation(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let x = read_f64(data)?;
    let y = read_f64(data)?;
    let z = read_f64(data)?;
    let yaw = read_f32(data)?;
    let pitch = read_f32(data)?;
    let on_ground = read_bool(data)?;
    Ok(Packet::PlayerPositionAndRotation {
        x,
        y,
        z,
        yaw,
        pitch,
        on_ground,
    })
}

fn encode_player_position_rotation(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::PlayerPositionAndRotation {
        x,
        y,
        z,
        yaw,
        pitch,
        on_ground,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the movement encoder", packet.kind())
    };
    buf.put_f64(*x);
    buf.put_f64(*y);
    buf.put_f64(*z);
    buf.put_f32(*yaw);
    buf.put_f32(*pitch);
    buf.put_u8(*on_ground as u8);
    Ok(())
}

fn decode_player_rotation(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let yaw = read_f32(data)?;
    let pitch = read_f32(data)?;
    let on_ground = read_bool(data)?;
    Ok(Packet::PlayerRotation {
        yaw,
        pitch,
        on_ground,
    })
}

fn encode_player_rotation(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::PlayerRotation {
        yaw,
        pitch,
        on_ground,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the movement encoder", packet.kind())
    };
    buf.put_f32(*yaw);
    buf.put_f32(*pitch);
    buf.put_u8(*on_ground as u8);
    Ok(())
}

fn decode_player_on_ground(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let on_ground = read_bool(data)?;
    Ok(Packet::PlayerOnGround { on_ground })
}

fn encode_player_on_ground(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::PlayerOnGround { on_ground } = packet else {
        unreachable!("catalog dispatched {:?} to the movement encoder", packet.kind())
    };
    buf.put_u8(*on_ground as u8);
    Ok(())
}

// === Block dig ===

fn validate_dig_status(status: i32) -> CodecResult<i32> {
    if !(0..=6).contains(&status) {
        return Err(CodecError::InvalidEnumValue {
            what: "dig status",
            value: status,
        });
    }
    Ok(status)
}

fn decode_block_dig_v1_8(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let status = validate_dig_status(read_i8(data)? as i32)?;
    let position = read_position(data, version)?;
    let face = read_u8(data)?;
    Ok(Packet::BlockDig {
        status,
        position,
        face,
        sequence: 0,
    })
}

fn encode_block_dig_v1_8(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::BlockDig {
        status,
        position,
        face,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the block-dig encoder", packet.kind())
    };
    buf.put_i8(*status as i8);
    write_position(buf, version, position);
    buf.put_u8(*face);
    Ok(())
}

/// 1.9 widened the status to a varint. The position layout inside follows
/// the connection version, so this routine serves both sides of the 477
/// cutover.
fn decode_block_dig_v1_9(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let status = validate_dig_status(read_varint(data)?)?;
    let position = read_position(data, version)?;
    let face = read_u8(data)?;
    Ok(Packet::BlockDig {
        status,
        position,
        face,
        sequence: 0,
    })
}

fn encode_block_dig_v1_9(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::BlockDig {
        status,
        position,
        face,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the block-dig encoder", packet.kind())
    };
    write_varint(buf, *status);
    write_position(buf, version, position);
    buf.put_u8(*face);
    Ok(())
}

/// 1.19 = the 1.9 shape plus a trailing sequence varint.
fn decode_block_dig_v1_19(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let mut packet = decode_block_dig_v1_9(data, version)?;
    if let Packet::BlockDig { sequence, .. } = &mut packet {
        *sequence = read_varint(data)?;
    }
    Ok(packet)
}

fn encode_block_dig_v1_19(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    encode_block_dig_v1_9(packet, buf, version)?;
    let Packet::BlockDig { sequence, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the block-dig encoder", packet.kind())
    };
    write_varint(buf, *sequence);
    Ok(())
}

// === Block place ===

fn decode_block_place_v1_8(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let position = read_position(data, version)?;
    let face = read_u8(data)?;
    let held_item = read_slot(data, version)?;
    let cursor_x = read_u8(data)? as f32 / 16.0;
    let cursor_y = read_u8(data)? as f32 / 16.0;
    let cursor_z = read_u8(data)? as f32 / 16.0;
    Ok(Packet::BlockPlace {
        hand: 0,
        position,
        face,
        cursor_x,
        cursor_y,
        cursor_z,
        inside_block: false,
        sequence: 0,
        held_item,
    })
}

fn encode_block_place_v1_8(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::BlockPlace {
        position,
        face,
        cursor_x,
        cursor_y,
        cursor_z,
        held_item,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the block-place encoder", packet.kind())
    };
    write_position(buf, version, position);
    buf.put_u8(*face);
    write_slot(buf, version, held_item);
    buf.put_u8((*cursor_x * 16.0) as u8);
    buf.put_u8((*cursor_y * 16.0) as u8);
    buf.put_u8((*cursor_z * 16.0) as u8);
    Ok(())
}

fn decode_block_place_v1_21(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let hand = read_varint(data)?;
    let position = read_position(data, version)?;
    let face = read_varint(data)? as u8;
    let cursor_x = read_f32(data)?;
    let cursor_y = read_f32(data)?;
    let cursor_z = read_f32(data)?;
    let inside_block = read_bool(data)?;
    let _world_border_hit = read_bool(data)?;
    let sequence = read_varint(data)?;
    Ok(Packet::BlockPlace {
        hand,
        position,
        face,
        cursor_x,
        cursor_y,
        cursor_z,
        inside_block,
        sequence,
        held_item: None,
    })
}

fn encode_block_place_v1_21(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::BlockPlace {
        hand,
        position,
        face,
        cursor_x,
        cursor_y,
        cursor_z,
        inside_block,
        sequence,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the block-place encoder", packet.kind())
    };
    write_varint(buf, *hand);
    write_position(buf, version, position);
    write_varint(buf, *face as i32);
    buf.put_f32(*cursor_x);
    buf.put_f32(*cursor_y);
    buf.put_f32(*cursor_z);
    buf.put_u8(*inside_block as u8);
    buf.put_u8(0); // world border hit
    write_varint(buf, *sequence);
    Ok(())
}

// === Inventory ===

fn decode_held_item_change(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let slot = read_i16(data)?;
    Ok(Packet::HeldItemChange { slot })
}

fn encode_held_item_change(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::HeldItemChange { slot } = packet else {
        unreachable!("catalog dispatched {:?} to the held-item encoder", packet.kind())
    };
    buf.put_i16(*slot);
    Ok(())
}

/// The slot-stub generation inside is picked by version in the shared codec.
fn decode_creative_action(data: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Packet> {
    let slot = read_i16(data)?;
    let item = read_slot(data, version)?;
    Ok(Packet::CreativeInventoryAction { slot, item })
}

fn encode_creative_action(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::CreativeInventoryAction { slot, item } = packet else {
        unreachable!("catalog dispatched {:?} to the creative encoder", packet.kind())
    };
    buf.put_i16(*slot);
    write_slot(buf, version, item);
    Ok(())
}

fn decode_confirm_teleportation(data: &mut BytesMut, _: ProtocolVersion) -> CodecResult<Packet> {
    let teleport_id = read_varint(data)?;
    Ok(Packet::ConfirmTeleportation { teleport_id })
}

fn encode_confirm_teleportation(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::ConfirmTeleportation { teleport_id } = packet else {
        unreachable!("catalog dispatched {:?} to the teleport encoder", packet.kind())
    };
    write_varint(buf, *teleport_id);
    Ok(())
}

// === Clientbound encoders ===

fn encode_join_game_v1_8(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::JoinGame {
        entity_id,
        is_hardcore,
        game_mode,
        dimension,
        difficulty,
        max_players,
        level_type,
        reduced_debug_info,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the join-game encoder", packet.kind())
    };
    buf.put_i32(*entity_id);
    let mut mode = game_mode.id();
    if *is_hardcore {
        mode |= 0x8;
    }
    buf.put_u8(mode);
    buf.put_i8(*dimension as i8);
    buf.put_u8(*difficulty);
    buf.put_u8(*max_players as u8);
    write_string(buf, level_type);
    buf.put_u8(*reduced_debug_info as u8);
    Ok(())
}

/// 1.9.1 widened the dimension to an i32; everything else is the 1.8 shape.
fn encode_join_game_v1_9_1(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::JoinGame {
        entity_id,
        is_hardcore,
        game_mode,
        dimension,
        difficulty,
        max_players,
        level_type,
        reduced_debug_info,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the join-game encoder", packet.kind())
    };
    buf.put_i32(*entity_id);
    let mut mode = game_mode.id();
    if *is_hardcore {
        mode |= 0x8;
    }
    buf.put_u8(mode);
    buf.put_i32(*dimension);
    buf.put_u8(*difficulty);
    buf.put_u8(*max_players as u8);
    write_string(buf, level_type);
    buf.put_u8(*reduced_debug_info as u8);
    Ok(())
}

fn encode_sync_position_v1_8(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::SynchronizePlayerPosition {
        position,
        yaw,
        pitch,
        flags,
        ..
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the sync-position encoder", packet.kind())
    };
    buf.put_f64(position.x);
    buf.put_f64(position.y);
    buf.put_f64(position.z);
    buf.put_f32(*yaw);
    buf.put_f32(*pitch);
    buf.put_u8(*flags);
    Ok(())
}

/// 1.9 appended the teleport id the client must confirm.
fn encode_sync_position_v1_9(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    encode_sync_position_v1_8(packet, buf, version)?;
    let Packet::SynchronizePlayerPosition { teleport_id, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the sync-position encoder", packet.kind())
    };
    write_varint(buf, *teleport_id);
    Ok(())
}

fn encode_spawn_position(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::SpawnPosition { position, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the spawn-position encoder", packet.kind())
    };
    write_position(buf, version, position);
    Ok(())
}

/// 1.18 appended the spawn angle.
fn encode_spawn_position_v1_18(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    encode_spawn_position(packet, buf, version)?;
    let Packet::SpawnPosition { angle, .. } = packet else {
        unreachable!("catalog dispatched {:?} to the spawn-position encoder", packet.kind())
    };
    buf.put_f32(*angle);
    Ok(())
}

fn encode_block_update(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::BlockUpdate { position, block_id } = packet else {
        unreachable!("catalog dispatched {:?} to the block-update encoder", packet.kind())
    };
    write_position(buf, version, position);
    write_varint(buf, *block_id);
    Ok(())
}

fn encode_set_container_slot(packet: &Packet, buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<()> {
    let Packet::SetContainerSlot {
        window_id,
        slot,
        item,
    } = packet
    else {
        unreachable!("catalog dispatched {:?} to the set-slot encoder", packet.kind())
    };
    buf.put_i8(*window_id);
    buf.put_i16(*slot);
    write_slot(buf, version, item);
    Ok(())
}

fn encode_play_disconnect_json(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::Disconnect { reason } = packet else {
        unreachable!("catalog dispatched {:?} to the disconnect encoder", packet.kind())
    };
    write_string(buf, &reason.to_json());
    Ok(())
}

/// 1.20.3 switched the reason to a network-NBT text component.
fn encode_play_disconnect_nbt(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
    let Packet::Disconnect { reason } = packet else {
        unreachable!("catalog dispatched {:?} to the disconnect encoder", packet.kind())
    };
    let nbt = NbtValue::Compound(vec![("text".into(), NbtValue::String(reason.text.clone()))]);
    nbt.write_root_network(buf);
    Ok(())
}

fn encode_set_compression_play(packet: &Packet, buf: &mut BytesMut, _: ProtocolVersion) -> CodecResult<()> {
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
    use quarry_types::{BlockPos, GameMode, ItemStack, TextComponent, Vec3d};

    fn decode_play(
        catalog: &PacketCatalog,
        version: i32,
        id: i32,
        data: &mut BytesMut,
    ) -> Decoded {
        catalog
            .decode_packet(
                ConnectionState::Play,
                Direction::ClientToServer,
                ProtocolVersion(version),
                id,
                data,
            )
            .unwrap()
    }

    #[test]
    fn test_client_settings_pre_1_9_consumes_exactly_its_layout() {
        let catalog = build_catalog();
        let mut data = BytesMut::new();
        write_string(&mut data, "en_GB");
        data.put_i8(8); // view distance
        data.put_i8(0); // chat mode (single byte in this layout)
        data.put_u8(1); // chat colors
        data.put_u8(0x7F); // skin parts

        match decode_play(&catalog, 47, 0x15, &mut data) {
            Decoded::Packet(Packet::ClientInformation {
                locale,
                view_distance,
                chat_mode,
                chat_colors,
                skin_parts,
                main_hand,
                text_filtering,
                allow_listing,
            }) => {
                assert_eq!(locale, "en_GB");
                assert_eq!(view_distance, 8);
                assert_eq!(chat_mode, 0);
                assert!(chat_colors);
                assert_eq!(skin_parts, 0x7F);
                // Absent-from-wire fields get their documented defaults.
                assert_eq!(main_hand, 1);
                assert!(!text_filtering);
                assert!(allow_listing);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty(), "decode must consume exactly the layout");
    }

    #[test]
    fn test_client_settings_same_id_reads_more_fields_at_109() {
        let catalog = build_catalog();
        // Same wire id as at 47, but the 1.9 layout: varint chat mode and a
        // trailing varint main hand.
        let mut data = BytesMut::new();
        write_string(&mut data, "en_GB");
        data.put_i8(8);
        write_varint(&mut data, 2); // chat mode
        data.put_u8(0);
        data.put_u8(0x40);
        write_varint(&mut data, 0); // main hand = left

        match decode_play(&catalog, 109, 0x15, &mut data) {
            Decoded::Packet(Packet::ClientInformation {
                chat_mode,
                main_hand,
                ..
            }) => {
                assert_eq!(chat_mode, 2);
                assert_eq!(main_hand, 0);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_client_settings_chained_trailing_flags() {
        let catalog = build_catalog();
        // 1.18 layout: the 1.9 shape + text filtering + allow listing.
        let mut data = BytesMut::new();
        write_string(&mut data, "de_DE");
        data.put_i8(10);
        write_varint(&mut data, 0);
        data.put_u8(1);
        data.put_u8(0);
        write_varint(&mut data, 1);
        data.put_u8(1); // text filtering
        data.put_u8(0); // allow listing

        match decode_play(&catalog, 757, 0x05, &mut data) {
            Decoded::Packet(Packet::ClientInformation {
                text_filtering,
                allow_listing,
                ..
            }) => {
                assert!(text_filtering);
                assert!(!allow_listing);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_keep_alive_width_cutover_at_340() {
        let catalog = build_catalog();

        // 339 still reads a varint...
        let mut data = BytesMut::new();
        write_varint(&mut data, 777);
        match decode_play(&catalog, 339, 0x0B, &mut data) {
            Decoded::Packet(Packet::KeepAliveServerbound { id }) => assert_eq!(id, 777),
            other => panic!("unexpected decode result: {:?}", other),
        }

        // ...340 reads an i64 under the same wire id.
        let mut data = BytesMut::new();
        data.put_i64(1 << 40);
        match decode_play(&catalog, 340, 0x0B, &mut data) {
            Decoded::Packet(Packet::KeepAliveServerbound { id }) => assert_eq!(id, 1 << 40),
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_block_dig_position_layout_cutover_at_477() {
        let catalog = build_catalog();
        let pos = BlockPos::new(100, 64, -200);

        let mut data = BytesMut::new();
        write_varint(&mut data, 0);
        data.put_u64(pos.encode_legacy());
        data.put_u8(1);
        match decode_play(&catalog, 476, 0x13, &mut data) {
            Decoded::Packet(Packet::BlockDig { position, .. }) => assert_eq!(position, pos),
            other => panic!("unexpected decode result: {:?}", other),
        }

        let mut data = BytesMut::new();
        write_varint(&mut data, 0);
        data.put_u64(pos.encode_modern());
        data.put_u8(1);
        match decode_play(&catalog, 477, 0x1A, &mut data) {
            Decoded::Packet(Packet::BlockDig { position, .. }) => assert_eq!(position, pos),
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_block_dig_sequence_appended_in_1_19() {
        let catalog = build_catalog();
        let pos = BlockPos::new(1, 2, 3);
        let mut data = BytesMut::new();
        write_varint(&mut data, 2);
        data.put_u64(pos.encode_modern());
        data.put_u8(1);
        write_varint(&mut data, 42);
        match decode_play(&catalog, 759, 0x1C, &mut data) {
            Decoded::Packet(Packet::BlockDig {
                status, sequence, ..
            }) => {
                assert_eq!(status, 2);
                assert_eq!(sequence, 42);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_block_dig_invalid_status() {
        let mut data = BytesMut::new();
        write_varint(&mut data, 99);
        data.put_u64(0);
        data.put_u8(0);
        assert!(matches!(
            decode_block_dig_v1_9(&mut data, ProtocolVersion::V1_9),
            Err(CodecError::InvalidEnumValue { value: 99, .. })
        ));
    }

    #[test]
    fn test_block_place_1_8_skips_held_item_stub() {
        let catalog = build_catalog();
        let pos = BlockPos::new(-5, 70, 9);
        let mut data = BytesMut::new();
        data.put_u64(pos.encode_legacy());
        data.put_u8(1); // face
        // Held item stub with an NBT tag that must be skipped.
        data.put_i16(276);
        data.put_i8(1);
        data.put_i16(0);
        quarry_nbt::nbt_compound! { "Unbreakable" => NbtValue::Byte(1) }
            .write_root_named("tag", &mut data);
        data.put_u8(8); // cursor x
        data.put_u8(16); // cursor y
        data.put_u8(0); // cursor z

        match decode_play(&catalog, 47, 0x08, &mut data) {
            Decoded::Packet(Packet::BlockPlace {
                position,
                held_item,
                cursor_x,
                cursor_y,
                ..
            }) => {
                assert_eq!(position, pos);
                assert_eq!(held_item, Some(ItemStack::new(276, 1, 0)));
                assert_eq!(cursor_x, 0.5);
                assert_eq!(cursor_y, 1.0);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_creative_action_slot_generations() {
        let catalog = build_catalog();

        // Pre-1.8: legacy presence-byte stub.
        let mut data = BytesMut::new();
        data.put_i16(36); // slot
        data.put_u8(1);
        data.put_i16(4); // item id
        data.put_i8(64);
        data.put_i16(0);
        data.put_u8(0); // no tag
        match decode_play(&catalog, 5, 0x10, &mut data) {
            Decoded::Packet(Packet::CreativeInventoryAction { slot, item }) => {
                assert_eq!(slot, 36);
                assert_eq!(item, Some(ItemStack::new(4, 64, 0)));
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());

        // 1.8: -1-sentinel stub, empty slot.
        let mut data = BytesMut::new();
        data.put_i16(36);
        data.put_i16(-1);
        match decode_play(&catalog, 47, 0x10, &mut data) {
            Decoded::Packet(Packet::CreativeInventoryAction { item, .. }) => {
                assert_eq!(item, None);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_unknown_play_id_is_ignored() {
        let catalog = build_catalog();
        let mut data = BytesMut::from(&[1u8, 2, 3, 4][..]);
        let decoded = decode_play(&catalog, 47, 0x7E, &mut data);
        assert!(matches!(decoded, Decoded::Ignored { id: 0x7E }));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_spawn_position_epochs() {
        let catalog = build_catalog();
        let pkt = Packet::SpawnPosition {
            position: BlockPos::new(0, 64, 0),
            angle: 90.0,
        };
        let encode_at = |v: i32| {
            catalog
                .encode_packet(
                    ConnectionState::Play,
                    Direction::ServerToClient,
                    ProtocolVersion(v),
                    &pkt,
                )
                .unwrap()
        };

        // Legacy layout, no angle: id + 8 bytes.
        let mut bytes = encode_at(47);
        assert_eq!(read_varint(&mut bytes).unwrap(), 0x05);
        assert_eq!(bytes.len(), 8);
        assert_eq!(
            BlockPos::decode_legacy(read_u64(&mut bytes).unwrap()),
            BlockPos::new(0, 64, 0)
        );

        // Modern layout, still no angle.
        let mut bytes = encode_at(477);
        assert_eq!(read_varint(&mut bytes).unwrap(), 0x4D);
        assert_eq!(
            BlockPos::decode_modern(read_u64(&mut bytes).unwrap()),
            BlockPos::new(0, 64, 0)
        );

        // 1.18 appends the f32 angle.
        let mut bytes = encode_at(757);
        assert_eq!(read_varint(&mut bytes).unwrap(), 0x4B);
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn test_join_game_dimension_width_at_108() {
        let catalog = build_catalog();
        let pkt = Packet::JoinGame {
            entity_id: 1,
            is_hardcore: false,
            game_mode: GameMode::Survival,
            dimension: -1,
            difficulty: 2,
            max_players: 20,
            level_type: "default".into(),
            reduced_debug_info: false,
        };
        let encode_at = |v: i32| {
            catalog
                .encode_packet(
                    ConnectionState::Play,
                    Direction::ServerToClient,
                    ProtocolVersion(v),
                    &pkt,
                )
                .unwrap()
        };
        // 1.9 renumbered the packet; 1.9.1 widened the dimension. At 107 the
        // i8 revision already lives under the new id and is three bytes
        // shorter than the i32 one.
        let mut legacy_id = encode_at(47);
        let mut narrow = encode_at(107);
        let mut wide = encode_at(108);
        assert_eq!(read_varint(&mut legacy_id).unwrap(), 0x01);
        assert_eq!(read_varint(&mut narrow).unwrap(), 0x23);
        assert_eq!(read_varint(&mut wide).unwrap(), 0x23);
        assert_eq!(narrow.len() + 3, wide.len());
    }

    #[test]
    fn test_keep_alive_and_movement_ids_moved_in_1_19() {
        let catalog = build_catalog();

        // The pre-1.19 keep-alive id stops resolving at 759 rather than
        // silently serving the wrong epoch...
        let mut data = BytesMut::new();
        data.put_i64(9);
        assert!(matches!(
            decode_play(&catalog, 759, 0x0F, &mut data),
            Decoded::Ignored { id: 0x0F }
        ));

        // ...the keep-alive moved to 0x11 and the movement quartet shifted
        // with it.
        let mut data = BytesMut::new();
        data.put_i64(9);
        match decode_play(&catalog, 759, 0x11, &mut data) {
            Decoded::Packet(Packet::KeepAliveServerbound { id }) => assert_eq!(id, 9),
            other => panic!("unexpected decode result: {:?}", other),
        }

        let mut data = BytesMut::new();
        data.put_f64(1.0);
        data.put_f64(64.0);
        data.put_f64(-2.0);
        data.put_u8(1);
        match decode_play(&catalog, 759, 0x13, &mut data) {
            Decoded::Packet(Packet::PlayerPosition { y, on_ground, .. }) => {
                assert_eq!(y, 64.0);
                assert!(on_ground);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_clientbound_ids_renumbered_in_1_13() {
        let catalog = build_catalog();
        let sync = Packet::SynchronizePlayerPosition {
            position: Vec3d::new(0.0, 64.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            flags: 0,
            teleport_id: 1,
        };
        let spawn = Packet::SpawnPosition {
            position: BlockPos::new(0, 64, 0),
            angle: 0.0,
        };
        let encode_at = |pkt: &Packet, v: i32| {
            catalog
                .encode_packet(
                    ConnectionState::Play,
                    Direction::ServerToClient,
                    ProtocolVersion(v),
                    pkt,
                )
                .unwrap()
        };

        assert_eq!(read_varint(&mut encode_at(&sync, 392)).unwrap(), 0x2F);
        assert_eq!(read_varint(&mut encode_at(&sync, 393)).unwrap(), 0x32);
        assert_eq!(read_varint(&mut encode_at(&spawn, 392)).unwrap(), 0x46);
        assert_eq!(read_varint(&mut encode_at(&spawn, 393)).unwrap(), 0x49);
    }

    #[test]
    fn test_play_disconnect_reason_format_cutover() {
        let catalog = build_catalog();
        let pkt = Packet::Disconnect {
            reason: TextComponent::plain("bye"),
        };
        let encode_at = |v: i32| {
            catalog
                .encode_packet(
                    ConnectionState::Play,
                    Direction::ServerToClient,
                    ProtocolVersion(v),
                    &pkt,
                )
                .unwrap()
        };

        // 1.20.2 still sends a JSON string.
        let mut bytes = encode_at(764);
        assert_eq!(read_varint(&mut bytes).unwrap(), 0x19);
        assert_eq!(read_string(&mut bytes, 32767).unwrap(), r#"{"text":"bye"}"#);

        // 1.20.3 sends network NBT: leading compound tag byte.
        let mut bytes = encode_at(765);
        assert_eq!(read_varint(&mut bytes).unwrap(), 0x1D);
        assert_eq!(bytes[0], quarry_nbt::TAG_COMPOUND);
    }

    #[test]
    fn test_movement_roundtrip_at_1_21() {
        let catalog = build_catalog();
        let pkt = Packet::PlayerPositionAndRotation {
            x: 10.5,
            y: 64.0,
            z: -3.25,
            yaw: 180.0,
            pitch: -12.5,
            on_ground: true,
        };
        let mut bytes = catalog
            .encode_packet(
                ConnectionState::Play,
                Direction::ClientToServer,
                ProtocolVersion::V1_21,
                &pkt,
            )
            .unwrap();
        let id = read_varint(&mut bytes).unwrap();
        assert_eq!(id, 0x1B);
        match decode_play(&catalog, 767, id, &mut bytes) {
            Decoded::Packet(Packet::PlayerPositionAndRotation { x, z, pitch, on_ground, .. }) => {
                assert_eq!(x, 10.5);
                assert_eq!(z, -3.25);
                assert_eq!(pitch, -12.5);
                assert!(on_ground);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_signed_chat_decodes_at_1_21() {
        let catalog = build_catalog();
        let mut data = BytesMut::new();
        write_string(&mut data, "hello");
        data.put_i64(1_700_000_000_000);
        data.put_i64(99);
        data.put_u8(1);
        data.put_slice(&[0xAA; 256]);
        write_varint(&mut data, 0);
        data.put_slice(&[0, 0, 0]);

        match decode_play(&catalog, 767, 0x06, &mut data) {
            Decoded::Packet(Packet::ChatMessage {
                message, signature, ..
            }) => {
                assert_eq!(message, "hello");
                assert_eq!(signature.unwrap().len(), 256);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
        assert!(data.is_empty());
    }

    #[test]
    fn test_truncated_registered_packet_is_fatal() {
        let catalog = build_catalog();
        // Keep-alive at 1.21 declares an i64 but only 4 bytes arrive.
        let mut data = BytesMut::from(&[0u8, 0, 0, 1][..]);
        let err = catalog
            .decode_packet(
                ConnectionState::Play,
                Direction::ClientToServer,
                ProtocolVersion::V1_21,
                0x18,
                &mut data,
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::BufferUnderflow));
    }
}
