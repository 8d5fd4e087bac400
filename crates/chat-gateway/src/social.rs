//! Social event router
//!
//! Delivers friend and membership notifications to an identity only while it
//! is online. The directory has already recorded the durable fact, so an
//! offline recipient simply finds it on its next query.

use crate::connection::{ConnectionManager, SessionRegistry};
use crate::events::ServerEvent;
use chat_core::Snowflake;
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct SocialRouter;

impl SocialRouter {
    /// Unicast to the identity's current connection, if any
    pub fn notify_if_online(
        sessions: &SessionRegistry,
        connections: &ConnectionManager,
        user_id: Snowflake,
        event: ServerEvent,
        data: Value,
    ) -> bool {
        let Some(connection_id) = sessions.connection_for(user_id) else {
            tracing::trace!(user_id = %user_id, event = %event, "Recipient offline, not notified");
            return false;
        };
        connections.send_to(connection_id, event, data)
    }
}
