//! Presence broadcaster
//!
//! Publishes the full online roster to every open connection. Clients replace
//! their list wholesale on each push.

use crate::connection::{ConnectionManager, SessionRegistry};
use crate::events::ServerEvent;
use chat_core::{RoomId, Snowflake};
use serde::Serialize;

/// One entry of the `online-users` roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub user_id: Snowflake,
    pub username: String,
    pub avatar: String,
    pub current_room: RoomId,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PresenceBroadcaster;

impl PresenceBroadcaster {
    /// One entry per live session, ordered by identity
    pub fn roster(sessions: &SessionRegistry) -> Vec<PresenceEntry> {
        let mut roster: Vec<_> = sessions
            .sessions()
            .map(|session| PresenceEntry {
                user_id: session.user_id,
                username: session.display.username.clone(),
                avatar: session.display.avatar.clone(),
                current_room: session.current_room.clone(),
            })
            .collect();
        roster.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then_with(|| a.current_room.cmp(&b.current_room))
        });
        roster
    }

    /// Push the roster to every open connection
    pub fn publish(sessions: &SessionRegistry, connections: &ConnectionManager) -> usize {
        let roster = Self::roster(sessions);
        match serde_json::to_value(&roster) {
            Ok(data) => connections.broadcast(ServerEvent::OnlineUsers, &data),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize presence roster");
                0
            }
        }
    }
}
