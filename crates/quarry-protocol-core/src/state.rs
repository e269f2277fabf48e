use thiserror::Error;

use crate::packets::{Packet, PacketKind};
use crate::version::ProtocolVersion;

/// The state (phase) of a protocol connection. Each phase has its own
/// packet-id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Handshaking,
    Status,
    Login,
    Configuration,
    Play,
}

impl ConnectionState {
    pub fn from_handshake_next(next: i32) -> Option<Self> {
        match next {
            1 => Some(ConnectionState::Status),
            2 => Some(ConnectionState::Login),
            _ => None,
        }
    }

    /// Whether this phase exists at all for the given protocol version.
    /// Configuration was introduced in 1.20.2.
    pub fn exists_for(self, version: ProtocolVersion) -> bool {
        match self {
            ConnectionState::Configuration => version.has_configuration_phase(),
            _ => true,
        }
    }
}

/// Packet flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("Illegal phase transition {from:?} -> {to:?} at protocol {version}")]
    IllegalTransition {
        from: ConnectionState,
        to: ConnectionState,
        version: ProtocolVersion,
    },
}

/// Per-connection phase state machine.
///
/// Decoding never changes phase. After processing a packet the caller asks
/// [`PhaseTracker::transition_after`] whether that packet implies a
/// transition and applies it with [`PhaseTracker::advance`], which rejects
/// edges the protocol does not allow.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    state: ConnectionState,
    version: ProtocolVersion,
}

impl PhaseTracker {
    /// A fresh connection: Handshaking, version unknown (0) until the
    /// handshake packet declares it.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Handshaking,
            version: ProtocolVersion(0),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Record the version the client declared in its handshake.
    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    /// The transition implied by a packet just processed in the current
    /// phase, if any. Purely a lookup; nothing is applied.
    pub fn transition_after(&self, packet: &Packet, direction: Direction) -> Option<ConnectionState> {
        match (self.state, direction, packet) {
            (ConnectionState::Handshaking, Direction::ClientToServer, Packet::Handshake { next_state, .. }) => {
                ConnectionState::from_handshake_next(*next_state)
            }
            // Pre-1.20.2 clients go straight to Play on login success; newer
            // ones must acknowledge first.
            (ConnectionState::Login, Direction::ServerToClient, Packet::LoginSuccess { .. }) => {
                if self.version.has_configuration_phase() {
                    None
                } else {
                    Some(ConnectionState::Play)
                }
            }
            (ConnectionState::Login, Direction::ClientToServer, Packet::LoginAcknowledged) => {
                Some(ConnectionState::Configuration)
            }
            // The client's finish-acknowledgment ends Configuration.
            (ConnectionState::Configuration, Direction::ClientToServer, p)
                if p.kind() == PacketKind::FinishConfigurationAck =>
            {
                Some(ConnectionState::Play)
            }
            _ => None,
        }
    }

    /// Apply a transition, validating the edge for this connection's version.
    pub fn advance(&mut self, to: ConnectionState) -> Result<(), PhaseError> {
        let legal = match (self.state, to) {
            (ConnectionState::Handshaking, ConnectionState::Status) => true,
            (ConnectionState::Handshaking, ConnectionState::Login) => true,
            (ConnectionState::Login, ConnectionState::Configuration) => {
                self.version.has_configuration_phase()
            }
            (ConnectionState::Login, ConnectionState::Play) => {
                !self.version.has_configuration_phase()
            }
            (ConnectionState::Configuration, ConnectionState::Play) => true,
            _ => false,
        };
        if !legal {
            return Err(PhaseError::IllegalTransition {
                from: self.state,
                to,
                version: self.version,
            });
        }
        self.state = to;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
