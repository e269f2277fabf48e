use quarry_nbt::NbtValue;
use quarry_types::{BlockPos, GameMode, GameProfile, ItemStack, TextComponent, Vec3d};
use uuid::Uuid;

/// Version-independent internal packet representation.
///
/// Wire variants convert between a historical byte layout and these. A field
/// a given wire layout does not carry is populated with the documented
/// default, never left ambiguous.
#[derive(Debug, Clone)]
pub enum Packet {
    // === Handshaking (serverbound) ===
    Handshake {
        protocol_version: i32,
        server_address: String,
        server_port: u16,
        /// 1 = Status, 2 = Login. Validated at decode.
        next_state: i32,
    },

    // === Status ===
    StatusRequest,
    StatusResponse {
        json: String,
    },
    PingRequest {
        payload: i64,
    },
    PongResponse {
        payload: i64,
    },

    // === Login (serverbound) ===
    LoginStart {
        name: String,
        /// Absent on the wire before 1.19.3; `None` then.
        uuid: Option<Uuid>,
    },
    EncryptionResponse {
        shared_secret: Vec<u8>,
        verify_token: Vec<u8>,
    },
    LoginAcknowledged,

    // === Login (clientbound) ===
    EncryptionRequest {
        server_id: String,
        public_key: Vec<u8>,
        verify_token: Vec<u8>,
    },
    SetCompression {
        threshold: i32,
    },
    LoginSuccess {
        profile: GameProfile,
    },

    // === Configuration (serverbound) / Client Settings in Play ===
    ClientInformation {
        locale: String,
        view_distance: i8,
        chat_mode: i32,
        chat_colors: bool,
        skin_parts: u8,
        /// Added in 1.9; defaults to 1 (right hand) for older layouts.
        main_hand: i32,
        /// Added in 1.17; defaults to false for older layouts.
        text_filtering: bool,
        /// Added in 1.18; defaults to true for older layouts.
        allow_listing: bool,
    },
    FinishConfigurationAck,
    KnownPacksResponse {
        packs: Vec<KnownPack>,
    },

    // === Configuration (clientbound) ===
    RegistryData {
        registry_id: String,
        entries: Vec<RegistryEntry>,
    },
    FinishConfiguration,
    KnownPacksRequest {
        packs: Vec<KnownPack>,
    },

    // === Play (serverbound) ===
    KeepAliveServerbound {
        /// VarInt on the wire before 1.12.2, i64 after; widened here.
        id: i64,
    },
    ChatMessage {
        message: String,
        /// Signing fields exist only from 1.19 on; zero/None for older layouts.
        timestamp: i64,
        salt: i64,
        signature: Option<Vec<u8>>,
        offset: i32,
        acknowledged: [u8; 3],
    },
    PlayerPosition {
        x: f64,
        y: f64,
        z: f64,
        on_ground: bool,
    },
    PlayerPositionAndRotation {
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    },
    PlayerRotation {
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    },
    PlayerOnGround {
        on_ground: bool,
    },
    BlockDig {
        status: i32,
        position: BlockPos,
        face: u8,
        /// Added in 1.19; 0 for older layouts.
        sequence: i32,
    },
    BlockPlace {
        /// Added in 1.9; 0 (main hand) for older layouts.
        hand: i32,
        position: BlockPos,
        face: u8,
        cursor_x: f32,
        cursor_y: f32,
        cursor_z: f32,
        /// Added in 1.14; false for older layouts.
        inside_block: bool,
        /// Added in 1.19; 0 for older layouts.
        sequence: i32,
        /// The 1.8 layout carries the held item stub inline; `None` elsewhere.
        held_item: Option<ItemStack>,
    },
    HeldItemChange {
        slot: i16,
    },
    CreativeInventoryAction {
        slot: i16,
        item: Option<ItemStack>,
    },
    ConfirmTeleportation {
        teleport_id: i32,
    },

    // === Play (clientbound) ===
    KeepAliveClientbound {
        id: i64,
    },
    JoinGame {
        entity_id: i32,
        is_hardcore: bool,
        game_mode: GameMode,
        /// i8 on the wire in [47,108), i32 from 1.9.1 on.
        dimension: i32,
        difficulty: u8,
        max_players: i32,
        level_type: String,
        reduced_debug_info: bool,
    },
    SynchronizePlayerPosition {
        position: Vec3d,
        yaw: f32,
        pitch: f32,
        flags: u8,
        /// Added in 1.9; 0 for older layouts.
        teleport_id: i32,
    },
    SpawnPosition {
        position: BlockPos,
        /// Added in 1.18; 0.0 for older layouts.
        angle: f32,
    },
    BlockUpdate {
        position: BlockPos,
        block_id: i32,
    },
    SetContainerSlot {
        window_id: i8,
        slot: i16,
        item: Option<ItemStack>,
    },

    // === Shared ===
    Disconnect {
        reason: TextComponent,
    },
}

/// Fieldless mirror of [`Packet`], used to look up a wire variant on the
/// encode path and to drive phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Handshake,
    StatusRequest,
    StatusResponse,
    PingRequest,
    PongResponse,
    LoginStart,
    EncryptionResponse,
    LoginAcknowledged,
    EncryptionRequest,
    SetCompression,
    LoginSuccess,
    ClientInformation,
    FinishConfigurationAck,
    KnownPacksResponse,
    RegistryData,
    FinishConfiguration,
    KnownPacksRequest,
    KeepAliveServerbound,
    ChatMessage,
    PlayerPosition,
    PlayerPositionAndRotation,
    PlayerRotation,
    PlayerOnGround,
    BlockDig,
    BlockPlace,
    HeldItemChange,
    CreativeInventoryAction,
    ConfirmTeleportation,
    KeepAliveClientbound,
    JoinGame,
    SynchronizePlayerPosition,
    SpawnPosition,
    BlockUpdate,
    SetContainerSlot,
    Disconnect,
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Handshake { .. } => PacketKind::Handshake,
            Packet::StatusRequest => PacketKind::StatusRequest,
            Packet::StatusResponse { .. } => PacketKind::StatusResponse,
            Packet::PingRequest { .. } => PacketKind::PingRequest,
            Packet::PongResponse { .. } => PacketKind::PongResponse,
            Packet::LoginStart { .. } => PacketKind::LoginStart,
            Packet::EncryptionResponse { .. } => PacketKind::EncryptionResponse,
            Packet::LoginAcknowledged => PacketKind::LoginAcknowledged,
            Packet::EncryptionRequest { .. } => PacketKind::EncryptionRequest,
            Packet::SetCompression { .. } => PacketKind::SetCompression,
            Packet::LoginSuccess { .. } => PacketKind::LoginSuccess,
            Packet::ClientInformation { .. } => PacketKind::ClientInformation,
            Packet::FinishConfigurationAck => PacketKind::FinishConfigurationAck,
            Packet::KnownPacksResponse { .. } => PacketKind::KnownPacksResponse,
            Packet::RegistryData { .. } => PacketKind::RegistryData,
            Packet::FinishConfiguration => PacketKind::FinishConfiguration,
            Packet::KnownPacksRequest { .. } => PacketKind::KnownPacksRequest,
            Packet::KeepAliveServerbound { .. } => PacketKind::KeepAliveServerbound,
            Packet::ChatMessage { .. } => PacketKind::ChatMessage,
            Packet::PlayerPosition { .. } => PacketKind::PlayerPosition,
            Packet::PlayerPositionAndRotation { .. } => PacketKind::PlayerPositionAndRotation,
            Packet::PlayerRotation { .. } => PacketKind::PlayerRotation,
            Packet::PlayerOnGround { .. } => PacketKind::PlayerOnGround,
            Packet::BlockDig { .. } => PacketKind::BlockDig,
            Packet::BlockPlace { .. } => PacketKind::BlockPlace,
            Packet::HeldItemChange { .. } => PacketKind::HeldItemChange,
            Packet::CreativeInventoryAction { .. } => PacketKind::CreativeInventoryAction,
            Packet::ConfirmTeleportation { .. } => PacketKind::ConfirmTeleportation,
            Packet::KeepAliveClientbound { .. } => PacketKind::KeepAliveClientbound,
            Packet::JoinGame { .. } => PacketKind::JoinGame,
            Packet::SynchronizePlayerPosition { .. } => PacketKind::SynchronizePlayerPosition,
            Packet::SpawnPosition { .. } => PacketKind::SpawnPosition,
            Packet::BlockUpdate { .. } => PacketKind::BlockUpdate,
            Packet::SetContainerSlot { .. } => PacketKind::SetContainerSlot,
            Packet::Disconnect { .. } => PacketKind::Disconnect,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KnownPack {
    pub namespace: String,
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub id: String,
    pub data: Option<NbtValue>,
}
