//! Friend and group-membership handlers
//!
//! The directory records every change first; notifications only go out once
//! that has succeeded.

use super::{ConnectionContext, HandlerResult};
use crate::coordinator::Command;
use crate::events::{
    encode, AddGroupMemberRequest, AddedToGroupEvent, FriendRequestAction,
    FriendRequestReceivedEvent, FriendRequestTarget, ServerEvent, SuccessEvent, UserEvent,
};
use crate::server::GatewayState;

pub struct SocialHandler;

impl SocialHandler {
    pub async fn send_friend_request(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: FriendRequestTarget,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        let directory = state.directory();

        let friend_request = directory
            .send_friend_request(user_id, request.username())
            .await?;
        let from = directory.resolve_identity(user_id).await?;

        tracing::debug!(from = %user_id, to = %friend_request.to, "Friend request sent");

        let event = ServerEvent::FriendRequestReceived;
        let received = FriendRequestReceivedEvent {
            request_id: friend_request.id,
            from,
        };
        state
            .coordinator()
            .send(Command::Notify {
                user_id: friend_request.to,
                event,
                data: encode(event, &received),
            })
            .await?;

        ctx.reply(ServerEvent::FriendRequestSent, &SuccessEvent::OK);
        Ok(())
    }

    pub async fn accept_friend_request(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: FriendRequestAction,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        let directory = state.directory();

        let accepted = directory
            .accept_friend_request(user_id, request.request_id())
            .await?;
        let me = directory.resolve_identity(user_id).await?;
        let requester = directory.resolve_identity(accepted.from).await?;

        let event = ServerEvent::FriendRequestAccepted;
        state
            .coordinator()
            .send(Command::Notify {
                user_id: accepted.from,
                event,
                data: encode(event, &UserEvent { user: me }),
            })
            .await?;

        ctx.reply(ServerEvent::FriendAdded, &UserEvent { user: requester });
        Ok(())
    }

    pub async fn reject_friend_request(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: FriendRequestAction,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        state
            .directory()
            .reject_friend_request(user_id, request.request_id())
            .await?;

        ctx.reply(ServerEvent::FriendRequestRejected, &SuccessEvent::OK);
        Ok(())
    }

    pub async fn add_group_member(
        state: &GatewayState,
        ctx: &ConnectionContext,
        request: AddGroupMemberRequest,
    ) -> HandlerResult<()> {
        let user_id = ctx.require_user()?;
        let directory = state.directory();

        let group = directory
            .add_group_member(&request.group_id, request.user_id, user_id)
            .await?;
        let member = directory.resolve_identity(request.user_id).await?;

        tracing::info!(
            room = %group.id,
            member = %request.user_id,
            added_by = %user_id,
            "Group member added"
        );

        let added = AddedToGroupEvent {
            group: group.summary_for(request.user_id),
        };
        state
            .coordinator()
            .send(Command::Notify {
                user_id: request.user_id,
                event: ServerEvent::AddedToGroup,
                data: encode(ServerEvent::AddedToGroup, &added),
            })
            .await?;
        state
            .coordinator()
            .send(Command::RoomBroadcast {
                room: group.id,
                event: ServerEvent::MemberAdded,
                data: encode(ServerEvent::MemberAdded, &UserEvent { user: member }),
            })
            .await?;
        Ok(())
    }
}
