//! Voice roster and relay bookkeeping
//!
//! An identity may sit in several rooms' rosters at once; nothing here
//! enforces a single active voice room.

use crate::connection::ConnectionId;
use crate::events::{ServerEvent, VoiceParticipantEvent};
use chat_core::{DisplayProfile, RoomId, Snowflake};
use std::collections::{BTreeMap, HashMap};

/// Negotiation payload kinds relayed between two peers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// Event used to deliver the payload to the target
    #[must_use]
    pub const fn event(self) -> ServerEvent {
        match self {
            Self::Offer => ServerEvent::VoiceOffer,
            Self::Answer => ServerEvent::VoiceAnswer,
            Self::IceCandidate => ServerEvent::VoiceIceCandidate,
        }
    }

    /// Field carrying the payload in both request and relayed event
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceParticipant {
    pub user_id: Snowflake,
    pub display: DisplayProfile,
    pub connection_id: ConnectionId,
}

impl VoiceParticipant {
    pub fn to_event(&self) -> VoiceParticipantEvent {
        VoiceParticipantEvent {
            user_id: self.user_id,
            username: self.display.username.clone(),
            avatar: self.display.avatar.clone(),
        }
    }
}

/// Outcome of a voice join
#[derive(Debug, Clone)]
pub struct VoiceJoined {
    /// Full roster after the join, joiner included
    pub roster: Vec<VoiceParticipant>,
    /// Connections of the participants that were already present
    pub others: Vec<ConnectionId>,
}

#[derive(Debug, Default)]
pub struct VoiceRelay {
    rooms: HashMap<RoomId, BTreeMap<Snowflake, VoiceParticipant>>,
}

impl VoiceRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the identity's roster entry for `room`
    pub fn join(
        &mut self,
        room: &RoomId,
        user_id: Snowflake,
        display: DisplayProfile,
        connection_id: ConnectionId,
    ) -> VoiceJoined {
        let roster = self.rooms.entry(room.clone()).or_default();
        roster.insert(
            user_id,
            VoiceParticipant {
                user_id,
                display,
                connection_id,
            },
        );

        tracing::debug!(
            room = %room,
            user_id = %user_id,
            participants = roster.len(),
            "Voice join"
        );

        VoiceJoined {
            roster: roster.values().cloned().collect(),
            others: roster
                .values()
                .filter(|p| p.user_id != user_id)
                .map(|p| p.connection_id.clone())
                .collect(),
        }
    }

    /// Remove the identity from `room`'s roster
    pub fn leave(&mut self, room: &RoomId, user_id: Snowflake) -> Option<VoiceParticipant> {
        let roster = self.rooms.get_mut(room)?;
        let removed = roster.remove(&user_id);
        if roster.is_empty() {
            self.rooms.remove(room);
        }
        if removed.is_some() {
            tracing::debug!(room = %room, user_id = %user_id, "Voice leave");
        }
        removed
    }

    /// Drop every entry the closed connection holds, returning affected rooms.
    ///
    /// Entries for the same identity held by a newer connection are kept.
    pub fn remove_connection(
        &mut self,
        user_id: Snowflake,
        connection_id: &ConnectionId,
    ) -> Vec<RoomId> {
        let affected: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, roster)| {
                roster
                    .get(&user_id)
                    .is_some_and(|p| p.connection_id == *connection_id)
            })
            .map(|(room, _)| room.clone())
            .collect();

        for room in &affected {
            self.leave(room, user_id);
        }
        affected
    }

    pub fn participants(&self, room: &RoomId) -> impl Iterator<Item = &VoiceParticipant> {
        self.rooms.get(room).into_iter().flat_map(BTreeMap::values)
    }

    pub fn is_participant(&self, room: &RoomId, user_id: Snowflake) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|roster| roster.contains_key(&user_id))
    }
}
