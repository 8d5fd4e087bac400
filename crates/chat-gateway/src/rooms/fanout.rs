//! Room fanout
//!
//! Per-room subscriber sets. Membership here is the live delivery scope and
//! is independent of the directory's durable group membership.

use crate::connection::{ConnectionId, ConnectionManager};
use crate::events::ServerEvent;
use chat_core::RoomId;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct RoomFanout {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomFanout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room; returns `false` if it was already there
    pub fn subscribe(&mut self, room: &RoomId, connection_id: &ConnectionId) -> bool {
        self.rooms
            .entry(room.clone())
            .or_default()
            .insert(connection_id.clone())
    }

    /// Remove a connection from a room, dropping the set once empty
    pub fn unsubscribe(&mut self, room: &RoomId, connection_id: &ConnectionId) -> bool {
        let Some(subscribers) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = subscribers.remove(connection_id);
        if subscribers.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    pub fn is_subscribed(&self, room: &RoomId, connection_id: &ConnectionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|subscribers| subscribers.contains(connection_id))
    }

    pub fn subscribers(&self, room: &RoomId) -> impl Iterator<Item = &ConnectionId> {
        self.rooms.get(room).into_iter().flatten()
    }

    /// Rooms the connection is subscribed to
    pub fn rooms_of<'a>(&'a self, connection_id: &'a ConnectionId) -> impl Iterator<Item = &'a RoomId> {
        self.rooms
            .iter()
            .filter(move |(_, subscribers)| subscribers.contains(connection_id))
            .map(|(room, _)| room)
    }

    /// Deliver an event to every current subscriber of `room`
    pub fn broadcast(
        &self,
        connections: &ConnectionManager,
        room: &RoomId,
        event: ServerEvent,
        data: &Value,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let targets = self
            .subscribers(room)
            .filter(|id| Some(*id) != exclude);
        let sent = connections.send_to_many(targets, event, data);

        tracing::trace!(room = %room, event = %event, sent = sent, "Room broadcast");

        sent
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
