use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block position in the world (x, y, z integers).
///
/// On the wire a block position is a single 64-bit value. Two bit layouts
/// exist historically; both pack x and z into 26 bits and y into 12 bits,
/// sign-extended on decode. Callers pick the layout by protocol version,
/// never by message kind — several unrelated messages switched layouts at
/// the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Encode in the legacy layout: x:26 | y:12 | z:26, MSB first.
    pub fn encode_legacy(&self) -> u64 {
        ((self.x as u64 & 0x3FFFFFF) << 38)
            | ((self.y as u64 & 0xFFF) << 26)
            | (self.z as u64 & 0x3FFFFFF)
    }

    pub fn decode_legacy(val: u64) -> Self {
        let x = sign_extend_26((val >> 38) as i32 & 0x3FFFFFF);
        let y = sign_extend_12((val >> 26) as i32 & 0xFFF);
        let z = sign_extend_26(val as i32 & 0x3FFFFFF);
        Self { x, y, z }
    }

    /// Encode in the modern layout: x:26 | z:26 | y:12, MSB first.
    pub fn encode_modern(&self) -> u64 {
        ((self.x as u64 & 0x3FFFFFF) << 38)
            | ((self.z as u64 & 0x3FFFFFF) << 12)
            | (self.y as u64 & 0xFFF)
    }

    pub fn decode_modern(val: u64) -> Self {
        let x = sign_extend_26((val >> 38) as i32 & 0x3FFFFFF);
        let z = sign_extend_26((val >> 12) as i32 & 0x3FFFFFF);
        let y = sign_extend_12(val as i32 & 0xFFF);
        Self { x, y, z }
    }
}

fn sign_extend_26(v: i32) -> i32 {
    if v >= 1 << 25 {
        v - (1 << 26)
    } else {
        v
    }
}

fn sign_extend_12(v: i32) -> i32 {
    if v >= 1 << 11 {
        v - (1 << 12)
    } else {
        v
    }
}

/// A 3D position with double precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A player's game profile (UUID + name + properties).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    pub uuid: Uuid,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

/// Text component for chat/disconnect messages (simplified JSON text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: None,
            italic: None,
            extra: Vec::new(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"text":""}"#.to_string())
    }
}

/// Game mode enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameMode {
    Survival = 0,
    Creative = 1,
    Adventure = 2,
    Spectator = 3,
}

impl GameMode {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(GameMode::Survival),
            1 => Some(GameMode::Creative),
            2 => Some(GameMode::Adventure),
            3 => Some(GameMode::Spectator),
            _ => None,
        }
    }
}

/// An item stack in an inventory slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    /// Item id in the numeric item registry.
    pub item_id: i32,
    /// Number of items in this stack (1-127).
    pub count: i8,
    /// Damage / metadata value (pre-flattening formats carry this on the wire).
    pub damage: i16,
}

impl ItemStack {
    pub fn new(item_id: i32, count: i8, damage: i16) -> Self {
        Self {
            item_id,
            count,
            damage,
        }
    }
}
