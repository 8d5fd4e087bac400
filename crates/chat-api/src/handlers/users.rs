//! User handlers
//!
//! Profile, settings, friends and the caller's groups.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chat_core::{
    DomainError, GroupSummary, PendingFriendRequest, ProfileUpdate, SettingsUpdate, Snowflake,
    User,
};

use crate::dto::{PublicUserResponse, SearchParams, UpdateProfileRequest};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::ApiState;

/// Maximum number of users a search returns
pub const SEARCH_LIMIT: usize = 10;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<ApiState>,
    auth: AuthUser,
) -> ApiResult<Json<User>> {
    let user = state
        .accounts()
        .find_by_id(auth.user_id)
        .await?
        .ok_or(DomainError::UserNotFound(auth.user_id))?;
    Ok(Json(user))
}

/// Update current user
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<ApiState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let update = ProfileUpdate {
        username: request.username.map(|name| name.trim().to_string()),
        bio: request.bio,
    };
    let user = state.accounts().update_profile(auth.user_id, update).await?;
    Ok(Json(user))
}

/// Merge client settings
///
/// PATCH /users/@me/settings
pub async fn update_settings(
    State(state): State<ApiState>,
    auth: AuthUser,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<User>> {
    let user = state.accounts().update_settings(auth.user_id, update).await?;
    Ok(Json(user))
}

/// Get current user's groups
///
/// GET /users/@me/groups
pub async fn get_current_user_groups(
    State(state): State<ApiState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<GroupSummary>>> {
    let groups = state.directory().user_groups(auth.user_id).await?;
    Ok(Json(groups))
}

/// GET /users/@me/friends
pub async fn get_friends(
    State(state): State<ApiState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    let friends = state.directory().friends(auth.user_id).await?;
    Ok(Json(friends))
}

/// Pending requests addressed to the caller
///
/// GET /users/@me/friend-requests
pub async fn get_friend_requests(
    State(state): State<ApiState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PendingFriendRequest>>> {
    let requests = state.directory().friend_requests(auth.user_id).await?;
    Ok(Json(requests))
}

/// Search users by username or email
///
/// GET /users/search?q=
pub async fn search_users(
    State(state): State<ApiState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<User>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let users = state
        .accounts()
        .search_users(query, auth.user_id, SEARCH_LIMIT)
        .await?;
    Ok(Json(users))
}

/// Get user by ID (public profile)
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<ApiState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PublicUserResponse>> {
    let user_id: Snowflake = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))?;

    let user = state
        .accounts()
        .find_by_id(user_id)
        .await?
        .ok_or(DomainError::UserNotFound(user_id))?;
    Ok(Json(user.into()))
}
