//! Connection manager
//!
//! The set of open connections, owned by the coordinator task. Sends are
//! fire-and-forget; a slow or closed connection never stalls the others.

use super::{Connection, ConnectionId};
use crate::events::ServerEvent;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of open connections
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: HashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection
    pub fn add(&mut self, connection: Arc<Connection>) {
        tracing::debug!(connection_id = %connection.id(), "Connection added");
        self.connections.insert(connection.id().clone(), connection);
    }

    /// Remove a connection, returning its handle if it was registered
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(id);
        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }
        removed
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Arc<Connection>> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Send an event to one connection
    pub fn send_to(&self, id: &ConnectionId, event: ServerEvent, data: Value) -> bool {
        match self.connections.get(id) {
            Some(connection) => connection.dispatch(event, data),
            None => false,
        }
    }

    /// Send an event to each listed connection that is still open
    pub fn send_to_many<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a ConnectionId>,
        event: ServerEvent,
        data: &Value,
    ) -> usize {
        let sent = ids
            .into_iter()
            .filter_map(|id| self.connections.get(id))
            .filter(|connection| connection.dispatch(event, data.clone()))
            .count();

        tracing::trace!(event = %event, sent = sent, "Event fanned out");

        sent
    }

    /// Broadcast an event to all connections
    pub fn broadcast(&self, event: ServerEvent, data: &Value) -> usize {
        let sent = self
            .connections
            .values()
            .filter(|connection| connection.dispatch(event, data.clone()))
            .count();

        tracing::debug!(event = %event, sent = sent, "Event broadcast to all connections");

        sent
    }

    /// Get the total number of open connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
