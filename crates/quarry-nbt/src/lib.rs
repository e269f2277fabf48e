use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// NBT tag type IDs.
pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_SHORT: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_LONG: u8 = 4;
pub const TAG_FLOAT: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_BYTE_ARRAY: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;
pub const TAG_INT_ARRAY: u8 = 11;
pub const TAG_LONG_ARRAY: u8 = 12;

/// Nesting deeper than this is rejected instead of recursed into. A hostile
/// frame packs one list level into five bytes, so the recursion must be
/// bounded long before the thread stack is.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("Unexpected end of NBT data")]
    UnexpectedEof,
    #[error("Unknown NBT tag type {0}")]
    UnknownTag(u8),
    #[error("NBT nesting deeper than {} levels", MAX_DEPTH)]
    DepthLimitExceeded,
}

pub type NbtResult<T> = Result<T, NbtError>;

/// An NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtValue>),
    Compound(Vec<(String, NbtValue)>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtValue {
    pub fn tag_id(&self) -> u8 {
        match self {
            NbtValue::Byte(_) => TAG_BYTE,
            NbtValue::Short(_) => TAG_SHORT,
            NbtValue::Int(_) => TAG_INT,
            NbtValue::Long(_) => TAG_LONG,
            NbtValue::Float(_) => TAG_FLOAT,
            NbtValue::Double(_) => TAG_DOUBLE,
            NbtValue::ByteArray(_) => TAG_BYTE_ARRAY,
            NbtValue::String(_) => TAG_STRING,
            NbtValue::List(_) => TAG_LIST,
            NbtValue::Compound(_) => TAG_COMPOUND,
            NbtValue::IntArray(_) => TAG_INT_ARRAY,
            NbtValue::LongArray(_) => TAG_LONG_ARRAY,
        }
    }

    /// Write this value as a root compound tag (with empty name) for network protocol.
    pub fn write_root_network(&self, buf: &mut BytesMut) {
        // Network NBT in 1.20.2+: root tag with type byte, but NO name
        buf.put_u8(self.tag_id());
        self.write_payload(buf);
    }

    /// Write this value as a full named root tag (for files and legacy wire NBT).
    pub fn write_root_named(&self, name: &str, buf: &mut BytesMut) {
        buf.put_u8(self.tag_id());
        write_nbt_string(name, buf);
        self.write_payload(buf);
    }

    /// Write just the payload (no tag type or name).
    pub fn write_payload(&self, buf: &mut BytesMut) {
        match self {
            NbtValue::Byte(v) => buf.put_i8(*v),
            NbtValue::Short(v) => buf.put_i16(*v),
            NbtValue::Int(v) => buf.put_i32(*v),
            NbtValue::Long(v) => buf.put_i64(*v),
            NbtValue::Float(v) => buf.put_f32(*v),
            NbtValue::Double(v) => buf.put_f64(*v),
            NbtValue::ByteArray(v) => {
                buf.put_i32(v.len() as i32);
                for b in v {
                    buf.put_i8(*b);
                }
            }
            NbtValue::String(v) => {
                write_nbt_string(v, buf);
            }
            NbtValue::List(v) => {
                if v.is_empty() {
                    buf.put_u8(TAG_END);
                    buf.put_i32(0);
                } else {
                    buf.put_u8(v[0].tag_id());
                    buf.put_i32(v.len() as i32);
                    for item in v {
                        item.write_payload(buf);
                    }
                }
            }
            NbtValue::Compound(entries) => {
                for (name, value) in entries {
                    buf.put_u8(value.tag_id());
                    write_nbt_string(name, buf);
                    value.write_payload(buf);
                }
                buf.put_u8(TAG_END);
            }
            NbtValue::IntArray(v) => {
                buf.put_i32(v.len() as i32);
                for i in v {
                    buf.put_i32(*i);
                }
            }
            NbtValue::LongArray(v) => {
                buf.put_i32(v.len() as i32);
                for l in v {
                    buf.put_i64(*l);
                }
            }
        }
    }
}

fn write_nbt_string(s: &str, buf: &mut BytesMut) {
    let bytes = s.as_bytes();
    buf.put_u16(bytes.len() as u16);
    buf.put_slice(bytes);
}

/// Skip an optional named root tag: a single type byte, where TAG_END means
/// no data follows. Returns whether a tag was present. This is the shape an
/// item-stub NBT payload takes on the wire.
pub fn skip_optional_root(buf: &mut BytesMut) -> NbtResult<bool> {
    let tag = take_u8(buf)?;
    if tag == TAG_END {
        return Ok(false);
    }
    skip_nbt_string(buf)?;
    skip_payload(tag, buf)?;
    Ok(true)
}

/// Skip one full named tag (type byte + name + payload).
pub fn skip_named_tag(buf: &mut BytesMut) -> NbtResult<()> {
    let tag = take_u8(buf)?;
    if tag == TAG_END {
        return Ok(());
    }
    skip_nbt_string(buf)?;
    skip_payload(tag, buf)
}

/// Skip the payload of a tag of the given type, recursing through lists and
/// compounds up to [`MAX_DEPTH`] levels. The payload is consumed byte-exactly
/// but never interpreted.
pub fn skip_payload(tag: u8, buf: &mut BytesMut) -> NbtResult<()> {
    skip_payload_bounded(tag, buf, 0)
}

fn skip_payload_bounded(tag: u8, buf: &mut BytesMut, depth: usize) -> NbtResult<()> {
    if depth > MAX_DEPTH {
        return Err(NbtError::DepthLimitExceeded);
    }
    match tag {
        TAG_END => Ok(()),
        TAG_BYTE => skip_bytes(buf, 1),
        TAG_SHORT => skip_bytes(buf, 2),
        TAG_INT | TAG_FLOAT => skip_bytes(buf, 4),
        TAG_LONG | TAG_DOUBLE => skip_bytes(buf, 8),
        TAG_BYTE_ARRAY => {
            let len = take_i32(buf)?;
            skip_bytes(buf, len.max(0) as usize)
        }
        TAG_STRING => skip_nbt_string(buf),
        TAG_LIST => {
            let elem = take_u8(buf)?;
            let len = take_i32(buf)?;
            for _ in 0..len.max(0) {
                skip_payload_bounded(elem, buf, depth + 1)?;
            }
            Ok(())
        }
        TAG_COMPOUND => loop {
            let inner = take_u8(buf)?;
            if inner == TAG_END {
                return Ok(());
            }
            skip_nbt_string(buf)?;
            skip_payload_bounded(inner, buf, depth + 1)?;
        },
        TAG_INT_ARRAY => {
            let len = take_i32(buf)?;
            skip_bytes(buf, (len.max(0) as usize) * 4)
        }
        TAG_LONG_ARRAY => {
            let len = take_i32(buf)?;
            skip_bytes(buf, (len.max(0) as usize) * 8)
        }
        other => Err(NbtError::UnknownTag(other)),
    }
}

fn skip_nbt_string(buf: &mut BytesMut) -> NbtResult<()> {
    if buf.remaining() < 2 {
        return Err(NbtError::UnexpectedEof);
    }
    let len = buf.get_u16() as usize;
    skip_bytes(buf, len)
}

fn skip_bytes(buf: &mut BytesMut, n: usize) -> NbtResult<()> {
    if buf.remaining() < n {
        return Err(NbtError::UnexpectedEof);
    }
    buf.advance(n);
    Ok(())
}

fn take_u8(buf: &mut BytesMut) -> NbtResult<u8> {
    if !buf.has_remaining() {
        return Err(NbtError::UnexpectedEof);
    }
    Ok(buf.get_u8())
}

fn take_i32(buf: &mut BytesMut) -> NbtResult<i32> {
    if buf.remaining() < 4 {
        return Err(NbtError::UnexpectedEof);
    }
    Ok(buf.get_i32())
}

/// Helper macro for building compound tags.
#[macro_export]
macro_rules! nbt_compound {
    ($($key:expr => $val:expr),* $(,)?) => {
        $crate::NbtValue::Compound(vec![
            $(($key.into(), $val)),*
        ])
    };
}

/// Helper macro for building list tags.
#[macro_export]
macro_rules! nbt_list {
    ($($val:expr),* $(,)?) => {
        $crate::NbtValue::List(vec![$($val),*])
    };
}
