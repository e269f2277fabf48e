use bytes::{Buf, BufMut, BytesMut};
use quarry_nbt::NbtError;
use quarry_types::{BlockPos, ItemStack};
use thiserror::Error;
use uuid::Uuid;

use crate::version::ProtocolVersion;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Buffer underflow: packet shorter than its layout")]
    BufferUnderflow,
    #[error("VarInt too long")]
    VarIntTooLong,
    #[error("Invalid {what} value: {value}")]
    InvalidEnumValue { what: &'static str, value: i32 },
    #[error("String too long: {0} > {1}")]
    StringTooLong(usize, usize),
    #[error("Malformed NBT: {0}")]
    Nbt(#[from] NbtError),
}

pub type CodecResult<T> = Result<T, CodecError>;

// === Checked fixed-width reads ===
//
// The framing layer hands us a bounded window; a read past its end means the
// stream is desynchronized and must surface as BufferUnderflow, never panic.

fn ensure(buf: &BytesMut, n: usize) -> CodecResult<()> {
    if buf.remaining() < n {
        return Err(CodecError::BufferUnderflow);
    }
    Ok(())
}

pub fn read_u8(buf: &mut BytesMut) -> CodecResult<u8> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

pub fn read_i8(buf: &mut BytesMut) -> CodecResult<i8> {
    ensure(buf, 1)?;
    Ok(buf.get_i8())
}

pub fn read_bool(buf: &mut BytesMut) -> CodecResult<bool> {
    Ok(read_u8(buf)? != 0)
}

pub fn read_u16(buf: &mut BytesMut) -> CodecResult<u16> {
    ensure(buf, 2)?;
    Ok(buf.get_u16())
}

pub fn read_i16(buf: &mut BytesMut) -> CodecResult<i16> {
    ensure(buf, 2)?;
    Ok(buf.get_i16())
}

pub fn read_i32(buf: &mut BytesMut) -> CodecResult<i32> {
    ensure(buf, 4)?;
    Ok(buf.get_i32())
}

pub fn read_i64(buf: &mut BytesMut) -> CodecResult<i64> {
    ensure(buf, 8)?;
    Ok(buf.get_i64())
}

pub fn read_u64(buf: &mut BytesMut) -> CodecResult<u64> {
    ensure(buf, 8)?;
    Ok(buf.get_u64())
}

pub fn read_f32(buf: &mut BytesMut) -> CodecResult<f32> {
    ensure(buf, 4)?;
    Ok(buf.get_f32())
}

pub fn read_f64(buf: &mut BytesMut) -> CodecResult<f64> {
    ensure(buf, 8)?;
    Ok(buf.get_f64())
}

// === VarInt ===

/// Read a VarInt from the buffer.
///
/// 7 payload bits per byte, least-significant group first, high bit is the
/// continuation flag, at most 5 bytes. No zig-zag: negative values use
/// their unsigned 32-bit bit pattern.
pub fn read_varint(buf: &mut BytesMut) -> CodecResult<i32> {
    let mut result: i32 = 0;
    let mut shift: u32 = 0;
    loop {
        if !buf.has_remaining() {
            return Err(CodecError::BufferUnderflow);
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as i32) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 32 {
            return Err(CodecError::VarIntTooLong);
        }
    }
}

/// Write a VarInt to the buffer.
pub fn write_varint(buf: &mut BytesMut, mut value: i32) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value = ((value as u32) >> 7) as i32;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

// === Strings ===

/// Read a protocol string (varint byte-length prefix, UTF-8 payload).
pub fn read_string(buf: &mut BytesMut, max_len: usize) -> CodecResult<String> {
    let len = read_varint(buf)? as usize;
    if len > max_len * 4 {
        return Err(CodecError::StringTooLong(len, max_len));
    }
    ensure(buf, len)?;
    let bytes = buf.split_to(len);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a protocol string.
pub fn write_string(buf: &mut BytesMut, s: &str) {
    write_varint(buf, s.len() as i32);
    buf.put_slice(s.as_bytes());
}

// === UUIDs ===

/// Read a UUID (128 bits, big endian).
pub fn read_uuid(buf: &mut BytesMut) -> CodecResult<Uuid> {
    ensure(buf, 16)?;
    let mut bytes = [0u8; 16];
    buf.copy_to_slice(&mut bytes);
    Ok(Uuid::from_bytes(bytes))
}

/// Write a UUID.
pub fn write_uuid(buf: &mut BytesMut, uuid: &Uuid) {
    buf.put_slice(uuid.as_bytes());
}

// === Byte arrays ===

/// Read a byte array with varint length prefix (1.8+).
pub fn read_byte_array(buf: &mut BytesMut) -> CodecResult<Vec<u8>> {
    let len = read_varint(buf)? as usize;
    ensure(buf, len)?;
    let bytes = buf.split_to(len);
    Ok(bytes.to_vec())
}

/// Write a byte array with varint length prefix.
pub fn write_byte_array(buf: &mut BytesMut, data: &[u8]) {
    write_varint(buf, data.len() as i32);
    buf.put_slice(data);
}

/// Read a byte array with a big-endian i16 length prefix (pre-1.8 login).
pub fn read_byte_array_short(buf: &mut BytesMut) -> CodecResult<Vec<u8>> {
    let len = read_i16(buf)?.max(0) as usize;
    ensure(buf, len)?;
    let bytes = buf.split_to(len);
    Ok(bytes.to_vec())
}

/// Write a byte array with a big-endian i16 length prefix.
pub fn write_byte_array_short(buf: &mut BytesMut, data: &[u8]) {
    buf.put_i16(data.len() as i16);
    buf.put_slice(data);
}

// === Packed block positions ===

/// Read a packed block position, picking the bit layout by protocol version.
/// The layout cutover is version-wide: every message switched at 1.14.
pub fn read_position(buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<BlockPos> {
    let raw = read_u64(buf)?;
    Ok(if version.modern_block_position() {
        BlockPos::decode_modern(raw)
    } else {
        BlockPos::decode_legacy(raw)
    })
}

/// Write a packed block position in the layout for the given version.
pub fn write_position(buf: &mut BytesMut, version: ProtocolVersion, pos: &BlockPos) {
    let raw = if version.modern_block_position() {
        pos.encode_modern()
    } else {
        pos.encode_legacy()
    };
    buf.put_u64(raw);
}

// === Item / slot stubs ===
//
// The server never interprets item NBT; it only has to consume the stub
// byte-exactly so the rest of the packet stays aligned.

/// Read a slot stub, picking the generation by protocol version.
pub fn read_slot(buf: &mut BytesMut, version: ProtocolVersion) -> CodecResult<Option<ItemStack>> {
    if version.modern_slot() {
        read_slot_modern(buf)
    } else {
        read_slot_legacy(buf)
    }
}

/// Write a slot stub in the generation for the given version. Any NBT the
/// stack once carried is not reproduced; the tag is written as absent.
pub fn write_slot(buf: &mut BytesMut, version: ProtocolVersion, slot: &Option<ItemStack>) {
    if version.modern_slot() {
        write_slot_modern(buf, slot)
    } else {
        write_slot_legacy(buf, slot)
    }
}

/// Legacy (pre-1.8) stub: presence byte, then i16 id, u8 count, i16 damage,
/// then a tag blob: one type byte (0 = none) followed by an i16 byte length
/// and that many opaque bytes.
pub fn read_slot_legacy(buf: &mut BytesMut) -> CodecResult<Option<ItemStack>> {
    let present = read_u8(buf)?;
    if present == 0 {
        return Ok(None);
    }
    let item_id = read_i16(buf)?;
    let count = read_i8(buf)?;
    let damage = read_i16(buf)?;
    skip_legacy_tag(buf)?;
    Ok(Some(ItemStack::new(item_id as i32, count, damage)))
}

pub fn write_slot_legacy(buf: &mut BytesMut, slot: &Option<ItemStack>) {
    match slot {
        None => buf.put_u8(0),
        Some(item) => {
            buf.put_u8(1);
            buf.put_i16(item.item_id as i16);
            buf.put_i8(item.count);
            buf.put_i16(item.damage);
            buf.put_u8(0); // no tag payload
        }
    }
}

fn skip_legacy_tag(buf: &mut BytesMut) -> CodecResult<()> {
    let tag = read_u8(buf)?;
    if tag == 0 {
        return Ok(());
    }
    let len = read_i16(buf)?.max(0) as usize;
    ensure(buf, len)?;
    buf.advance(len);
    Ok(())
}

/// 1.8+ stub: i16 id where -1 means empty, then u8 count, i16 damage, then
/// an NBT tag whose leading type byte of TAG_END means no compound follows.
/// Anything else is skipped with the general tag skipper, nesting included.
pub fn read_slot_modern(buf: &mut BytesMut) -> CodecResult<Option<ItemStack>> {
    let item_id = read_i16(buf)?;
    if item_id == -1 {
        return Ok(None);
    }
    let count = read_i8(buf)?;
    let damage = read_i16(buf)?;
    quarry_nbt::skip_optional_root(buf)?;
    Ok(Some(ItemStack::new(item_id as i32, count, damage)))
}

pub fn write_slot_modern(buf: &mut BytesMut, slot: &Option<ItemStack>) {
    match slot {
        None => buf.put_i16(-1),
        Some(item) => {
            buf.put_i16(item.item_id as i16);
            buf.put_i8(item.count);
            buf.put_i16(item.damage);
            buf.put_u8(quarry_nbt::TAG_END);
        }
    }
}
