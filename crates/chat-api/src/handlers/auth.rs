//! Authentication handlers
//!
//! Endpoints for user registration and login.

use axum::{extract::State, Json};
use chat_common::{hash_password, verify_credentials};
use chat_core::{DomainError, NewUser};
use tracing::{info, instrument};

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::ApiState;

/// Register a new user
///
/// POST /auth/register
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let password_hash = hash_password(&request.password)?;

    let user = state
        .accounts()
        .register(NewUser {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash,
        })
        .await?;

    let token = state.jwt_service().issue(user.id)?;

    info!(user_id = %user.id, "User registered");

    Ok(Created(Json(AuthResponse { token, user })))
}

/// Login with email and password
///
/// POST /auth/login
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .accounts()
        .find_by_email(request.email.trim())
        .await?
        .ok_or(DomainError::InvalidCredentials)?;

    let password_hash = state
        .accounts()
        .password_hash(user.id)
        .await?
        .ok_or(DomainError::InvalidCredentials)?;

    verify_credentials(&request.password, &password_hash)?;

    let token = state.jwt_service().issue(user.id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse { token, user }))
}
