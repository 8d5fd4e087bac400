//! Client message handlers
//!
//! Heartbeats are answered in place; named events are routed to their
//! handler, which consults the directory and then queues a coordinator
//! command.

mod authenticate;
mod error;
mod heartbeat;
mod rooms;
mod social;
mod voice;

pub use authenticate::AuthenticateHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use rooms::RoomHandler;
pub use social::SocialHandler;
pub use voice::VoiceHandler;

use crate::connection::{Connection, ConnectionId};
use crate::events::{encode, ClientEvent, ServerEvent};
use crate::protocol::{CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;
use crate::voice::SignalKind;
use chat_core::Snowflake;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Per-socket state owned by the receive task
#[derive(Debug)]
pub struct ConnectionContext {
    pub connection: Arc<Connection>,
    /// Set once `authenticate` has been accepted
    pub user_id: Option<Snowflake>,
}

impl ConnectionContext {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            user_id: None,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        self.connection.id()
    }

    pub fn require_user(&self) -> HandlerResult<Snowflake> {
        self.user_id.ok_or(HandlerError::NotAuthenticated)
    }

    /// Send an event straight to this connection
    pub fn reply<T: Serialize>(&self, event: ServerEvent, payload: &T) -> bool {
        self.connection.dispatch(event, encode(event, payload))
    }
}

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub async fn dispatch(
        state: &GatewayState,
        ctx: &mut ConnectionContext,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        match message.op {
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().flatten();
                HeartbeatHandler::handle(&ctx.connection, seq);
                Ok(None)
            }
            OpCode::Event => {
                Self::dispatch_event(state, ctx, &message).await?;
                Ok(None)
            }
            _ => {
                tracing::warn!(
                    connection_id = %ctx.id(),
                    op = %message.op,
                    "Received server-only op code from client"
                );
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }

    async fn dispatch_event(
        state: &GatewayState,
        ctx: &mut ConnectionContext,
        message: &GatewayMessage,
    ) -> HandlerResult<()> {
        let name = message
            .t
            .as_deref()
            .ok_or_else(|| HandlerError::InvalidPayload("missing event name".to_string()))?;
        let event =
            ClientEvent::from_str(name).ok_or_else(|| HandlerError::UnknownEvent(name.to_string()))?;

        if ctx.user_id.is_none() && !event.allowed_before_auth() {
            return Err(HandlerError::NotAuthenticated);
        }

        tracing::trace!(connection_id = %ctx.id(), event = %event, "Client event");

        match event {
            ClientEvent::Authenticate => {
                AuthenticateHandler::handle(state, ctx, parse(message, event)?).await
            }
            ClientEvent::SendMessage => {
                RoomHandler::send_message(state, ctx, parse(message, event)?).await
            }
            ClientEvent::JoinGroup => RoomHandler::join(state, ctx, parse(message, event)?).await,
            ClientEvent::CreateGroup => {
                RoomHandler::create(state, ctx, parse(message, event)?).await
            }
            ClientEvent::Typing => RoomHandler::typing(state, ctx, parse(message, event)?).await,
            ClientEvent::SendFriendRequest => {
                SocialHandler::send_friend_request(state, ctx, parse(message, event)?).await
            }
            ClientEvent::AcceptFriendRequest => {
                SocialHandler::accept_friend_request(state, ctx, parse(message, event)?).await
            }
            ClientEvent::RejectFriendRequest => {
                SocialHandler::reject_friend_request(state, ctx, parse(message, event)?).await
            }
            ClientEvent::AddGroupMember => {
                SocialHandler::add_group_member(state, ctx, parse(message, event)?).await
            }
            ClientEvent::JoinVoiceChat => {
                VoiceHandler::join(state, ctx, parse(message, event)?).await
            }
            ClientEvent::LeaveVoiceChat => {
                VoiceHandler::leave(state, ctx, parse(message, event)?).await
            }
            ClientEvent::VoiceOffer => {
                VoiceHandler::signal(state, ctx, SignalKind::Offer, parse(message, event)?).await
            }
            ClientEvent::VoiceAnswer => {
                VoiceHandler::signal(state, ctx, SignalKind::Answer, parse(message, event)?).await
            }
            ClientEvent::VoiceIceCandidate => {
                let request = parse(message, event)?;
                VoiceHandler::signal(state, ctx, SignalKind::IceCandidate, request).await
            }
            ClientEvent::VoiceActivity => {
                VoiceHandler::activity(state, ctx, parse(message, event)?).await
            }
        }
    }
}

fn parse<T: DeserializeOwned>(message: &GatewayMessage, event: ClientEvent) -> HandlerResult<T> {
    message
        .data()
        .map_err(|e| HandlerError::InvalidPayload(format!("{event}: {e}")))
}
