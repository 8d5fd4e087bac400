//! Coordinator state
//!
//! Owns every live map: open connections, sessions, room subscriptions, the
//! message log and voice rosters. Commands are applied one at a time, so no
//! two mutations ever interleave.

use super::Command;
use crate::connection::{Connection, ConnectionId, ConnectionManager, Session, SessionRegistry};
use crate::events::{
    encode, AuthenticatedEvent, ErrorEvent, GroupJoinedEvent, RoomMembershipEvent, ServerEvent,
    TypingEvent, VoiceActivityEvent, VoiceParticipantEvent, VoiceUserLeftEvent,
};
use crate::presence::PresenceBroadcaster;
use crate::rooms::{MessageLog, RoomFanout};
use crate::social::SocialRouter;
use crate::voice::{SignalKind, VoiceRelay};
use chat_common::ChatConfig;
use chat_core::{ChatMessage, GroupSummary, RoomId, Snowflake, SnowflakeGenerator, User};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct Coordinator {
    default_room: RoomId,
    ids: Arc<SnowflakeGenerator>,
    connections: ConnectionManager,
    sessions: SessionRegistry,
    rooms: RoomFanout,
    log: MessageLog,
    voice: VoiceRelay,
}

impl Coordinator {
    pub fn new(config: &ChatConfig, ids: Arc<SnowflakeGenerator>) -> Self {
        let default_room = RoomId::new(config.default_room.as_str());
        let mut log = MessageLog::new(config.history_capacity);
        log.create_room(&default_room);

        Self {
            default_room,
            ids,
            connections: ConnectionManager::new(),
            sessions: SessionRegistry::new(),
            rooms: RoomFanout::new(),
            log,
            voice: VoiceRelay::new(),
        }
    }

    /// Apply one command to the live state
    pub fn apply(&mut self, command: Command) {
        tracing::trace!(command = command.name(), "Applying command");

        match command {
            Command::Connect { connection } => self.connect(connection),
            Command::Authenticate {
                connection_id,
                user,
                groups,
            } => self.authenticate(&connection_id, user, groups),
            Command::JoinRoom {
                connection_id,
                group,
            } => self.join_room(&connection_id, group),
            Command::CreateRoom {
                connection_id,
                group,
            } => self.create_room(&connection_id, group),
            Command::SendMessage {
                connection_id,
                text,
                room,
            } => self.send_message(&connection_id, text, room),
            Command::Typing {
                connection_id,
                is_typing,
            } => self.typing(&connection_id, is_typing),
            Command::Notify {
                user_id,
                event,
                data,
            } => {
                SocialRouter::notify_if_online(
                    &self.sessions,
                    &self.connections,
                    user_id,
                    event,
                    data,
                );
            }
            Command::RoomBroadcast { room, event, data } => {
                self.rooms
                    .broadcast(&self.connections, &room, event, &data, None);
            }
            Command::VoiceJoin {
                connection_id,
                room,
            } => self.voice_join(&connection_id, &room),
            Command::VoiceLeave {
                connection_id,
                room,
            } => self.voice_leave(&connection_id, &room),
            Command::VoiceSignal {
                connection_id,
                kind,
                room,
                to,
                payload,
            } => self.voice_signal(&connection_id, kind, room, to, payload),
            Command::VoiceActivity {
                connection_id,
                room,
                is_speaking,
            } => self.voice_activity(&connection_id, &room, is_speaking),
            Command::Disconnect { connection_id } => self.disconnect(&connection_id),
        }
    }

    // === Read access ===

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn rooms(&self) -> &RoomFanout {
        &self.rooms
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn voice(&self) -> &VoiceRelay {
        &self.voice
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    // === Session lifecycle ===

    fn connect(&mut self, connection: Arc<Connection>) {
        self.connections.add(connection);
    }

    fn authenticate(
        &mut self,
        connection_id: &ConnectionId,
        user: User,
        groups: Vec<GroupSummary>,
    ) {
        if !self.connections.contains(connection_id) {
            tracing::debug!(
                connection_id = %connection_id,
                user_id = %user.id,
                "Connection closed before authentication committed"
            );
            return;
        }
        if self.sessions.session(connection_id).is_some() {
            self.reply_error(connection_id, "Already authenticated");
            return;
        }

        let room = self.default_room.clone();
        let profile = user.display();
        let superseded = self.sessions.admit(
            connection_id.clone(),
            user.id,
            profile.clone(),
            room.clone(),
        );
        if let Some(previous) = superseded {
            tracing::info!(
                user_id = %user.id,
                previous = %previous,
                current = %connection_id,
                "Identity re-authenticated on a new connection"
            );
        }
        self.rooms.subscribe(&room, connection_id);

        tracing::info!(
            connection_id = %connection_id,
            user_id = %user.id,
            username = %profile.username,
            "Session authenticated"
        );

        let joined = RoomMembershipEvent {
            user_id: user.id,
            username: profile.username,
            room: room.clone(),
        };
        self.send(
            connection_id,
            ServerEvent::Authenticated,
            &AuthenticatedEvent { user, groups },
        );
        self.broadcast_room(&room, ServerEvent::UserJoined, &joined, None);
        self.send_history(connection_id, &room);
        self.publish_presence();
    }

    fn disconnect(&mut self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);

        let Some(session) = self.sessions.terminate(connection_id) else {
            tracing::debug!(
                connection_id = %connection_id,
                "Unauthenticated connection closed"
            );
            return;
        };

        self.rooms.unsubscribe(&session.current_room, connection_id);
        let left = RoomMembershipEvent {
            user_id: session.user_id,
            username: session.display.username.clone(),
            room: session.current_room.clone(),
        };
        self.broadcast_room(&session.current_room, ServerEvent::UserLeft, &left, None);

        for room in self.voice.remove_connection(session.user_id, connection_id) {
            self.announce_voice_left(&room, session.user_id);
        }

        self.publish_presence();

        tracing::info!(
            connection_id = %connection_id,
            user_id = %session.user_id,
            "Session ended"
        );
    }

    // === Rooms ===

    fn join_room(&mut self, connection_id: &ConnectionId, group: GroupSummary) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        let room = group.id.clone();
        let joined_event = GroupJoinedEvent {
            group_id: room.clone(),
            group,
        };

        if session.current_room == room {
            self.rooms.subscribe(&room, connection_id);
            self.send(connection_id, ServerEvent::GroupJoined, &joined_event);
            self.send_history(connection_id, &room);
            return;
        }

        // Leave before join: the connection is never visible in two rooms
        let previous = session.current_room.clone();
        self.rooms.unsubscribe(&previous, connection_id);
        self.rooms.subscribe(&room, connection_id);
        self.sessions.switch_room(connection_id, room.clone());

        let left = RoomMembershipEvent {
            user_id: session.user_id,
            username: session.display.username.clone(),
            room: previous.clone(),
        };
        self.broadcast_room(&previous, ServerEvent::UserLeft, &left, None);

        self.send(connection_id, ServerEvent::GroupJoined, &joined_event);
        let joined = RoomMembershipEvent {
            user_id: session.user_id,
            username: session.display.username,
            room: room.clone(),
        };
        self.broadcast_room(&room, ServerEvent::UserJoined, &joined, None);
        self.send_history(connection_id, &room);
        self.publish_presence();

        tracing::debug!(
            connection_id = %connection_id,
            from = %previous,
            to = %room,
            "Room switched"
        );
    }

    fn create_room(&mut self, connection_id: &ConnectionId, group: GroupSummary) {
        self.log.create_room(&group.id);

        let announced = GroupSummary {
            is_admin: None,
            ..group.clone()
        };
        self.connections.broadcast(
            ServerEvent::GroupCreated,
            &encode(ServerEvent::GroupCreated, &announced),
        );

        self.join_room(connection_id, group);
    }

    fn send_message(
        &mut self,
        connection_id: &ConnectionId,
        text: String,
        room: Option<RoomId>,
    ) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        if let Some(requested) = room {
            if requested != session.current_room {
                self.reply_error(connection_id, format!("You are not in room {requested}"));
                return;
            }
        }

        let message = ChatMessage::new(
            self.ids.generate(),
            session.user_id,
            &session.display,
            text,
            session.current_room.clone(),
        );
        self.log.append(message.clone());
        self.broadcast_room(&session.current_room, ServerEvent::NewMessage, &message, None);
    }

    fn typing(&self, connection_id: &ConnectionId, is_typing: bool) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        let event = TypingEvent {
            user_id: session.user_id,
            username: session.display.username,
            is_typing,
        };
        self.broadcast_room(
            &session.current_room,
            ServerEvent::UserTyping,
            &event,
            Some(connection_id),
        );
    }

    // === Voice ===

    fn voice_join(&mut self, connection_id: &ConnectionId, room: &RoomId) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        let joined = self.voice.join(
            room,
            session.user_id,
            session.display.clone(),
            connection_id.clone(),
        );

        let roster: Vec<VoiceParticipantEvent> =
            joined.roster.iter().map(|p| p.to_event()).collect();
        self.send(connection_id, ServerEvent::VoiceParticipantsList, &roster);

        // Only participants already in voice hear about the newcomer
        let newcomer = VoiceParticipantEvent {
            user_id: session.user_id,
            username: session.display.username,
            avatar: session.display.avatar,
        };
        self.connections.send_to_many(
            &joined.others,
            ServerEvent::VoiceUserJoined,
            &encode(ServerEvent::VoiceUserJoined, &newcomer),
        );
    }

    fn voice_leave(&mut self, connection_id: &ConnectionId, room: &RoomId) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        if self.voice.leave(room, session.user_id).is_some() {
            self.announce_voice_left(room, session.user_id);
        }
    }

    fn voice_signal(
        &self,
        connection_id: &ConnectionId,
        kind: SignalKind,
        room: Option<RoomId>,
        to: Snowflake,
        payload: Value,
    ) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        let Some(target) = self.sessions.connection_for(to) else {
            tracing::trace!(
                from = %session.user_id,
                to = %to,
                kind = ?kind,
                "Signal target offline"
            );
            return;
        };

        let mut data = Map::new();
        data.insert("from".to_string(), encode(kind.event(), &session.user_id));
        if let Some(room) = room {
            data.insert("room".to_string(), Value::String(room.to_string()));
        }
        data.insert(kind.field().to_string(), payload);

        self.connections
            .send_to(target, kind.event(), Value::Object(data));
    }

    fn voice_activity(&self, connection_id: &ConnectionId, room: &RoomId, is_speaking: bool) {
        let Some(session) = self.session(connection_id) else {
            return;
        };
        if session.current_room != *room && !self.voice.is_participant(room, session.user_id) {
            tracing::debug!(
                connection_id = %connection_id,
                room = %room,
                "Voice activity for a room the sender is not in, dropped"
            );
            return;
        }
        let event = VoiceActivityEvent {
            user_id: session.user_id,
            is_speaking,
            room: room.clone(),
        };
        self.broadcast_room(room, ServerEvent::VoiceActivity, &event, Some(connection_id));
    }

    /// Tell the room and the remaining voice participants that `user_id` left
    fn announce_voice_left(&self, room: &RoomId, user_id: Snowflake) {
        let targets: BTreeSet<&ConnectionId> = self
            .rooms
            .subscribers(room)
            .chain(self.voice.participants(room).map(|p| &p.connection_id))
            .collect();
        let event = VoiceUserLeftEvent {
            user_id,
            room: room.clone(),
        };
        self.connections.send_to_many(
            targets,
            ServerEvent::VoiceUserLeft,
            &encode(ServerEvent::VoiceUserLeft, &event),
        );
    }

    // === Delivery helpers ===

    /// Snapshot of the session bound to `connection_id`.
    ///
    /// Commands for connections that closed (or never authenticated) while
    /// their directory call was in flight are dropped here.
    fn session(&self, connection_id: &ConnectionId) -> Option<Session> {
        let session = self.sessions.session(connection_id).cloned();
        if session.is_none() {
            tracing::debug!(
                connection_id = %connection_id,
                "No session for connection, command dropped"
            );
        }
        session
    }

    fn send<T: Serialize>(
        &self,
        connection_id: &ConnectionId,
        event: ServerEvent,
        payload: &T,
    ) -> bool {
        self.connections
            .send_to(connection_id, event, encode(event, payload))
    }

    fn broadcast_room<T: Serialize>(
        &self,
        room: &RoomId,
        event: ServerEvent,
        payload: &T,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        self.rooms.broadcast(
            &self.connections,
            room,
            event,
            &encode(event, payload),
            exclude,
        )
    }

    fn send_history(&self, connection_id: &ConnectionId, room: &RoomId) {
        let history = self.log.history(room);
        self.send(connection_id, ServerEvent::MessageHistory, &history);
    }

    fn reply_error(&self, connection_id: &ConnectionId, message: impl Into<String>) {
        self.send(connection_id, ServerEvent::Error, &ErrorEvent::new(message));
    }

    fn publish_presence(&self) {
        PresenceBroadcaster::publish(&self.sessions, &self.connections);
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("default_room", &self.default_room)
            .field("connections", &self.connections.len())
            .field("sessions", &self.sessions.len())
            .field("rooms", &self.rooms.room_count())
            .finish()
    }
}
