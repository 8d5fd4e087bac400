//! Heartbeat handler (op 1)

use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use std::sync::Arc;

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Handle a heartbeat from the client
    ///
    /// `last_sequence` is the last sequence number the client has seen.
    pub fn handle(connection: &Arc<Connection>, last_sequence: Option<u64>) {
        connection.record_heartbeat();

        tracing::trace!(
            connection_id = %connection.id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        if !connection.send(GatewayMessage::heartbeat_ack()) {
            tracing::warn!(connection_id = %connection.id(), "Failed to queue heartbeat ACK");
        }
    }
}
