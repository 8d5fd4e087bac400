//! Gateway events
//!
//! Names and payloads of the events exchanged with clients.

mod event_types;
mod payloads;

pub use event_types::{ClientEvent, ServerEvent};
pub use payloads::{
    AddGroupMemberRequest, AddedToGroupEvent, AuthErrorEvent, AuthenticateRequest,
    AuthenticatedEvent, CreateGroupRequest, ErrorEvent, FriendRequestAction,
    FriendRequestReceivedEvent, FriendRequestTarget, GroupJoinedEvent, JoinGroupRequest,
    RoomMembershipEvent, SendMessageRequest, SuccessEvent, TypingEvent, TypingRequest, UserEvent,
    VoiceActivityEvent, VoiceActivityRequest, VoiceParticipantEvent, VoiceRoomRequest,
    VoiceSignalRequest, VoiceUserLeftEvent,
};

use serde::Serialize;
use serde_json::Value;

/// Serialize an event body, logging and sending `null` if that ever fails
pub fn encode<T: Serialize>(event: ServerEvent, payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|e| {
        tracing::error!(event = %event, error = %e, "Failed to serialize event payload");
        Value::Null
    })
}
