//! Session registry
//!
//! Bookkeeping of which connection is bound to which identity, and which
//! room each session occupies. It never touches rooms or sockets itself.

use super::{ConnectionId, Session};
use chat_core::{DisplayProfile, RoomId, Snowflake};
use std::collections::HashMap;

/// Sessions by connection plus the identity-to-connection index
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,

    /// Most recently authenticated connection per identity
    by_identity: HashMap<Snowflake, ConnectionId>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for an authenticated connection.
    ///
    /// If the identity was already bound to another connection, the index is
    /// pointed at the new one and the superseded connection id is returned. The
    /// superseded session itself stays alive until its connection closes.
    pub fn admit(
        &mut self,
        connection_id: ConnectionId,
        user_id: Snowflake,
        display: DisplayProfile,
        room: RoomId,
    ) -> Option<ConnectionId> {
        let session = Session::new(connection_id.clone(), user_id, display, room);
        self.sessions.insert(connection_id.clone(), session);

        let superseded = self
            .by_identity
            .insert(user_id, connection_id.clone())
            .filter(|previous| *previous != connection_id);

        tracing::debug!(
            connection_id = %connection_id,
            user_id = %user_id,
            superseded = ?superseded.as_ref().map(ConnectionId::as_str),
            "Session admitted"
        );

        superseded
    }

    pub fn session(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    pub fn current_room(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.sessions.get(connection_id).map(|s| &s.current_room)
    }

    /// Point the session at `room`, returning the room it left
    pub fn switch_room(&mut self, connection_id: &ConnectionId, room: RoomId) -> Option<RoomId> {
        let session = self.sessions.get_mut(connection_id)?;
        Some(std::mem::replace(&mut session.current_room, room))
    }

    /// Remove the session for a closed connection.
    ///
    /// The identity index entry is only dropped when it still points at this
    /// connection, so a newer session for the same identity keeps receiving
    /// unicasts.
    pub fn terminate(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        let session = self.sessions.remove(connection_id)?;
        if self.by_identity.get(&session.user_id) == Some(connection_id) {
            self.by_identity.remove(&session.user_id);
        }

        tracing::debug!(
            connection_id = %connection_id,
            user_id = %session.user_id,
            "Session terminated"
        );

        Some(session)
    }

    /// Connection currently receiving unicasts for `user_id`
    pub fn connection_for(&self, user_id: Snowflake) -> Option<&ConnectionId> {
        self.by_identity.get(&user_id)
    }

    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.by_identity.contains_key(&user_id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
