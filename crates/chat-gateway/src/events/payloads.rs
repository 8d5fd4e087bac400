//! Event payload definitions
//!
//! Client request bodies (the `d` of op 2 frames) and the bodies of the
//! events the gateway dispatches. Several client events accept either a bare
//! value or an object, so both `"group_123"` and `{"groupId": "group_123"}`
//! are valid `join-group` bodies.

use chat_core::{GroupKind, GroupSummary, RoomId, Snowflake, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// === Client Requests ===

/// `authenticate` body
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthenticateRequest {
    Token(String),
    Object { token: String },
}

impl AuthenticateRequest {
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Token(token) | Self::Object { token } => token,
        }
    }
}

/// `send-message` body
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    /// Must match the sender's current room when present
    #[serde(default)]
    pub room: Option<RoomId>,
}

/// `join-group` body
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JoinGroupRequest {
    Id(RoomId),
    Object {
        #[serde(rename = "groupId")]
        group_id: RoomId,
    },
}

impl JoinGroupRequest {
    #[must_use]
    pub fn into_room(self) -> RoomId {
        match self {
            Self::Id(room) | Self::Object { group_id: room } => room,
        }
    }
}

/// `create-group` body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: GroupKind,
}

/// `typing` body
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum TypingRequest {
    Flag(bool),
    Object {
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
}

impl TypingRequest {
    #[must_use]
    pub fn is_typing(self) -> bool {
        match self {
            Self::Flag(is_typing) | Self::Object { is_typing } => is_typing,
        }
    }
}

/// `send-friend-request` body
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FriendRequestTarget {
    Username(String),
    Object { username: String },
}

impl FriendRequestTarget {
    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Username(username) | Self::Object { username } => username,
        }
    }
}

/// `accept-friend-request` / `reject-friend-request` body
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FriendRequestAction {
    Id(String),
    Object {
        #[serde(rename = "requestId")]
        request_id: String,
    },
}

impl FriendRequestAction {
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { request_id: id } => id,
        }
    }
}

/// `add-group-member` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupMemberRequest {
    pub group_id: RoomId,
    pub user_id: Snowflake,
}

/// `join-voice-chat` / `leave-voice-chat` body
///
/// Clients also send their own id and display name here; those are ignored in
/// favour of the authenticated session.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceRoomRequest {
    pub room: RoomId,
}

/// `voice-offer` / `voice-answer` / `voice-ice-candidate` body
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSignalRequest {
    #[serde(default)]
    pub room: Option<RoomId>,
    pub to: Snowflake,
    #[serde(default)]
    pub offer: Option<Value>,
    #[serde(default)]
    pub answer: Option<Value>,
    #[serde(default)]
    pub candidate: Option<Value>,
}

/// `voice-activity` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceActivityRequest {
    pub room: RoomId,
    pub is_speaking: bool,
}

// === Server Events ===

/// `authenticated` body
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedEvent {
    pub user: User,
    pub groups: Vec<GroupSummary>,
}

/// `auth-error` body
#[derive(Debug, Clone, Serialize)]
pub struct AuthErrorEvent {
    pub error: String,
}

/// `error` body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `user-joined` / `user-left` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMembershipEvent {
    pub user_id: Snowflake,
    pub username: String,
    pub room: RoomId,
}

/// `group-joined` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupJoinedEvent {
    pub group_id: RoomId,
    pub group: GroupSummary,
}

/// `user-typing` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    pub user_id: Snowflake,
    pub username: String,
    pub is_typing: bool,
}

/// `friend-request-received` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestReceivedEvent {
    pub request_id: String,
    pub from: User,
}

/// `friend-request-accepted`, `friend-added` and `member-added` body
#[derive(Debug, Clone, Serialize)]
pub struct UserEvent {
    pub user: User,
}

/// `friend-request-sent` / `friend-request-rejected` body
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SuccessEvent {
    pub success: bool,
}

impl SuccessEvent {
    pub const OK: Self = Self { success: true };
}

/// `added-to-group` body
#[derive(Debug, Clone, Serialize)]
pub struct AddedToGroupEvent {
    pub group: GroupSummary,
}

/// Entry of `voice-participants-list` and body of `voice-user-joined`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParticipantEvent {
    pub user_id: Snowflake,
    pub username: String,
    pub avatar: String,
}

/// `voice-user-left` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceUserLeftEvent {
    pub user_id: Snowflake,
    pub room: RoomId,
}

/// `voice-activity` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceActivityEvent {
    pub user_id: Snowflake,
    pub is_speaking: bool,
    pub room: RoomId,
}
