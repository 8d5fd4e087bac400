//! Gateway event names
//!
//! Server events travel in the `t` field of Dispatch frames; client events in
//! the `t` field of Event frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Events the gateway dispatches to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerEvent {
    // Session events
    /// Token accepted; carries the profile and group list
    Authenticated,
    /// Token rejected; the connection stays open
    AuthError,
    /// A client event could not be applied
    Error,

    // Room events
    NewMessage,
    MessageHistory,
    /// Sent to the joiner after a room switch
    GroupJoined,
    /// Sent to every connection when a room is created
    GroupCreated,
    UserJoined,
    UserLeft,
    UserTyping,
    OnlineUsers,

    // Social events
    FriendRequestReceived,
    FriendRequestSent,
    FriendRequestAccepted,
    FriendAdded,
    FriendRequestRejected,
    AddedToGroup,
    MemberAdded,

    // Voice events
    VoiceParticipantsList,
    VoiceUserJoined,
    VoiceUserLeft,
    VoiceOffer,
    VoiceAnswer,
    VoiceIceCandidate,
    VoiceActivity,
}

impl ServerEvent {
    /// Get the wire name of the event
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::AuthError => "auth-error",
            Self::Error => "error",
            Self::NewMessage => "new-message",
            Self::MessageHistory => "message-history",
            Self::GroupJoined => "group-joined",
            Self::GroupCreated => "group-created",
            Self::UserJoined => "user-joined",
            Self::UserLeft => "user-left",
            Self::UserTyping => "user-typing",
            Self::OnlineUsers => "online-users",
            Self::FriendRequestReceived => "friend-request-received",
            Self::FriendRequestSent => "friend-request-sent",
            Self::FriendRequestAccepted => "friend-request-accepted",
            Self::FriendAdded => "friend-added",
            Self::FriendRequestRejected => "friend-request-rejected",
            Self::AddedToGroup => "added-to-group",
            Self::MemberAdded => "member-added",
            Self::VoiceParticipantsList => "voice-participants-list",
            Self::VoiceUserJoined => "voice-user-joined",
            Self::VoiceUserLeft => "voice-user-left",
            Self::VoiceOffer => "voice-offer",
            Self::VoiceAnswer => "voice-answer",
            Self::VoiceIceCandidate => "voice-ice-candidate",
            Self::VoiceActivity => "voice-activity",
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events clients send inside op 2 frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientEvent {
    Authenticate,
    SendMessage,
    JoinGroup,
    CreateGroup,
    Typing,
    SendFriendRequest,
    AcceptFriendRequest,
    RejectFriendRequest,
    AddGroupMember,
    JoinVoiceChat,
    LeaveVoiceChat,
    VoiceOffer,
    VoiceAnswer,
    VoiceIceCandidate,
    VoiceActivity,
}

impl ClientEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::SendMessage => "send-message",
            Self::JoinGroup => "join-group",
            Self::CreateGroup => "create-group",
            Self::Typing => "typing",
            Self::SendFriendRequest => "send-friend-request",
            Self::AcceptFriendRequest => "accept-friend-request",
            Self::RejectFriendRequest => "reject-friend-request",
            Self::AddGroupMember => "add-group-member",
            Self::JoinVoiceChat => "join-voice-chat",
            Self::LeaveVoiceChat => "leave-voice-chat",
            Self::VoiceOffer => "voice-offer",
            Self::VoiceAnswer => "voice-answer",
            Self::VoiceIceCandidate => "voice-ice-candidate",
            Self::VoiceActivity => "voice-activity",
        }
    }

    /// Parse a client event name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "authenticate" => Some(Self::Authenticate),
            "send-message" => Some(Self::SendMessage),
            "join-group" => Some(Self::JoinGroup),
            "create-group" => Some(Self::CreateGroup),
            "typing" => Some(Self::Typing),
            "send-friend-request" => Some(Self::SendFriendRequest),
            "accept-friend-request" => Some(Self::AcceptFriendRequest),
            "reject-friend-request" => Some(Self::RejectFriendRequest),
            "add-group-member" => Some(Self::AddGroupMember),
            "join-voice-chat" => Some(Self::JoinVoiceChat),
            "leave-voice-chat" => Some(Self::LeaveVoiceChat),
            "voice-offer" => Some(Self::VoiceOffer),
            "voice-answer" => Some(Self::VoiceAnswer),
            "voice-ice-candidate" => Some(Self::VoiceIceCandidate),
            "voice-activity" => Some(Self::VoiceActivity),
            _ => None,
        }
    }

    /// Whether the event may be sent before `authenticate` succeeds
    #[must_use]
    pub const fn allowed_before_auth(self) -> bool {
        matches!(self, Self::Authenticate)
    }
}

impl fmt::Display for ClientEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
