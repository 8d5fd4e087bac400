//! Commands applied by the coordinator
//!
//! Socket tasks do their directory lookups first and only then submit a
//! command, so everything here is already validated against durable state.

use crate::connection::{Connection, ConnectionId};
use crate::events::ServerEvent;
use crate::voice::SignalKind;
use chat_core::{GroupSummary, RoomId, Snowflake, User};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug)]
pub enum Command {
    /// A socket was accepted
    Connect { connection: Arc<Connection> },

    /// Token verified and identity resolved
    Authenticate {
        connection_id: ConnectionId,
        user: User,
        groups: Vec<GroupSummary>,
    },

    /// Access already granted by the directory
    JoinRoom {
        connection_id: ConnectionId,
        group: GroupSummary,
    },

    /// Group just created in the directory; the creator is switched into it
    CreateRoom {
        connection_id: ConnectionId,
        group: GroupSummary,
    },

    /// Text already trimmed and length-checked
    SendMessage {
        connection_id: ConnectionId,
        text: String,
        room: Option<RoomId>,
    },

    Typing {
        connection_id: ConnectionId,
        is_typing: bool,
    },

    /// Unicast to an identity if it is online
    Notify {
        user_id: Snowflake,
        event: ServerEvent,
        data: Value,
    },

    /// Deliver to every subscriber of a room
    RoomBroadcast {
        room: RoomId,
        event: ServerEvent,
        data: Value,
    },

    VoiceJoin {
        connection_id: ConnectionId,
        room: RoomId,
    },

    VoiceLeave {
        connection_id: ConnectionId,
        room: RoomId,
    },

    /// Offer, answer or ICE candidate for one peer
    VoiceSignal {
        connection_id: ConnectionId,
        kind: SignalKind,
        room: Option<RoomId>,
        to: Snowflake,
        payload: Value,
    },

    VoiceActivity {
        connection_id: ConnectionId,
        room: RoomId,
        is_speaking: bool,
    },

    /// Socket closed or timed out
    Disconnect { connection_id: ConnectionId },
}

impl Command {
    /// Short name for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Authenticate { .. } => "authenticate",
            Self::JoinRoom { .. } => "join_room",
            Self::CreateRoom { .. } => "create_room",
            Self::SendMessage { .. } => "send_message",
            Self::Typing { .. } => "typing",
            Self::Notify { .. } => "notify",
            Self::RoomBroadcast { .. } => "room_broadcast",
            Self::VoiceJoin { .. } => "voice_join",
            Self::VoiceLeave { .. } => "voice_leave",
            Self::VoiceSignal { .. } => "voice_signal",
            Self::VoiceActivity { .. } => "voice_activity",
            Self::Disconnect { .. } => "disconnect",
        }
    }
}
