//! `authenticate` handler

use super::{ConnectionContext, HandlerError, HandlerResult};
use crate::coordinator::Command;
use crate::events::AuthenticateRequest;
use crate::server::GatewayState;

pub struct AuthenticateHandler;

impl AuthenticateHandler {
    /// Verify the token, resolve the identity and hand the session to the
    /// coordinator. A failure leaves the connection open and unauthenticated.
    pub async fn handle(
        state: &GatewayState,
        ctx: &mut ConnectionContext,
        request: AuthenticateRequest,
    ) -> HandlerResult<()> {
        if ctx.user_id.is_some() {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        let user_id = state.verifier().verify(request.token()).map_err(|e| {
            tracing::debug!(connection_id = %ctx.id(), error = %e, "Token rejected");
            HandlerError::AuthenticationFailed(e.to_string())
        })?;

        let user = state
            .directory()
            .resolve_identity(user_id)
            .await
            .map_err(|e| {
                tracing::debug!(user_id = %user_id, error = %e, "Identity lookup failed");
                HandlerError::AuthenticationFailed(e.to_string())
            })?;

        let default_room = state.default_room();
        if let Err(e) = state.directory().join_group(&default_room, user_id).await {
            tracing::warn!(
                room = %default_room,
                user_id = %user_id,
                error = %e,
                "Could not record default room membership"
            );
        }
        let groups = state.directory().user_groups(user_id).await?;

        state
            .coordinator()
            .send(Command::Authenticate {
                connection_id: ctx.id().clone(),
                user,
                groups,
            })
            .await?;
        ctx.user_id = Some(user_id);

        Ok(())
    }
}
