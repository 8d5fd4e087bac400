//! Authentication extractor
//!
//! Extracts and validates the bearer token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chat_core::Snowflake;

use crate::response::ApiError;
use crate::state::ApiState;

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    ApiState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let api_state = ApiState::from_ref(state);

        let claims = api_state
            .jwt_service()
            .decode_token(bearer.token())
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                ApiError::InvalidToken
            })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in token");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser::new(user_id))
    }
}
