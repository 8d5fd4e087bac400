//! Authenticated session
//!
//! The live binding of one connection to one identity.

use super::ConnectionId;
use chat_core::{DisplayProfile, RoomId, Snowflake};

/// A session, created when a connection authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub user_id: Snowflake,
    /// Name and avatar captured at authentication; never re-fetched
    pub display: DisplayProfile,
    pub current_room: RoomId,
}

impl Session {
    pub fn new(
        connection_id: ConnectionId,
        user_id: Snowflake,
        display: DisplayProfile,
        room: RoomId,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            display,
            current_room: room,
        }
    }
}
