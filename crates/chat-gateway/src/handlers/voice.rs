//! Voice signaling handlers
//!
//! The session's own identity and display snapshot are used for every voice
//! event; ids and names sent by the client are ignored.

use super::{ConnectionContext, HandlerError, HandlerResult};
use crate::coordinator::Command;
use crate::events::{VoiceActivityRequest, VoiceRoomRequest, VoiceSignalRequest};
use crate::rooms;
use crate::server::GatewayState;
use crate::voice::SignalKind;

pub struct VoiceHandler;

impl VoiceHandler {
    pub async fn join(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: VoiceRoomRequest,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        rooms::check_access(state.directory(), &request.room, user_id).await?;

        state
            .coordinator()
            .send(Command::VoiceJoin {
                connection_id: ctx.id().clone(),
                room: request.room,
            })
            .await?;
        Ok(())
    }

    pub async fn leave(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: VoiceRoomRequest,
    ) -> HandlerResult<()> {
        ctx.require_user()?;
        state
            .coordinator()
            .send(Command::VoiceLeave {
                connection_id: ctx.id().clone(),
                room: request.room,
            })
            .await?;
        Ok(())
    }

    pub async fn signal(
        state: &GatewayState,
        ctx: &ConnectionContext,
        kind: SignalKind,
        request: VoiceSignalRequest,
    ) -> HandlerResult<()> {
        ctx.require_user()?;
        let payload = match kind {
            SignalKind::Offer => request.offer,
            SignalKind::Answer => request.answer,
            SignalKind::IceCandidate => request.candidate,
        }
        .ok_or_else(|| HandlerError::InvalidPayload(format!("missing field `{}`", kind.field())))?;

        state
            .coordinator()
            .send(Command::VoiceSignal {
                connection_id: ctx.id().clone(),
                kind,
                room: request.room,
                to: request.to,
                payload,
            })
            .await?;
        Ok(())
    }

    pub async fn activity(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: VoiceActivityRequest,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        rooms::check_access(state.directory(), &request.room, user_id).await?;

        state
            .coordinator()
            .send(Command::VoiceActivity {
                connection_id: ctx.id().clone(),
                room: request.room,
                is_speaking: request.is_speaking,
            })
            .await?;
        Ok(())
    }
}
