//! Room event handlers: `send-message`, `join-group`, `create-group`, `typing`

use super::{ConnectionContext, HandlerError, HandlerResult};
use crate::coordinator::Command;
use crate::events::{CreateGroupRequest, JoinGroupRequest, SendMessageRequest, TypingRequest};
use crate::rooms;
use crate::server::GatewayState;
use chat_core::{ChatMessage, DomainError, NewGroup};
use validator::Validate;

pub struct RoomHandler;

impl RoomHandler {
    pub async fn send_message(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: SendMessageRequest,
    ) -> HandlerResult<()> {
        ctx.require_user()?;
        let text = ChatMessage::validate_text(&request.text, state.config().max_message_length)?;

        state
            .coordinator()
            .send(Command::SendMessage {
                connection_id: ctx.id().clone(),
                text,
                room: request.room,
            })
            .await?;
        Ok(())
    }

    pub async fn join(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: JoinGroupRequest,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        let room = request.into_room();
        let group = rooms::authorize(state.directory(), &room, user_id).await?;

        state
            .coordinator()
            .send(Command::JoinRoom {
                connection_id: ctx.id().clone(),
                group: group.summary_for(user_id),
            })
            .await?;
        Ok(())
    }

    pub async fn create(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: CreateGroupRequest,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        let new_group = NewGroup {
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            kind: request.kind,
            creator: user_id,
        };
        new_group
            .validate()
            .map_err(|e| HandlerError::Domain(DomainError::ValidationError(e.to_string())))?;

        let group = state.directory().create_group(new_group).await?;
        tracing::info!(room = %group.id, creator = %user_id, "Group created");

        state
            .coordinator()
            .send(Command::CreateRoom {
                connection_id: ctx.id().clone(),
                group: group.summary_for(user_id),
            })
            .await?;
        Ok(())
    }

    pub async fn typing(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: TypingRequest,
    ) -> HandlerResult<()> {
        ctx.require_user()?;
        state
            .coordinator()
            .send(Command::Typing {
                connection_id: ctx.id().clone(),
                is_typing: request.is_typing(),
            })
            .await?;
        Ok(())
    }
}
