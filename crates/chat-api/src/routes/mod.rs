//! Route definitions
//!
//! API routes mounted under /api/v1, health at the root.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{auth, groups, health, users};
use crate::state::ApiState;

/// Create the main API router
pub fn create_router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
}

/// API v1 routes
fn api_v1_routes() -> Router<ApiState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(group_routes())
}

/// Authentication routes
fn auth_routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// User routes
fn user_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/@me/settings", patch(users::update_settings))
        .route("/users/@me/groups", get(users::get_current_user_groups))
        .route("/users/@me/friends", get(users::get_friends))
        .route("/users/@me/friend-requests", get(users::get_friend_requests))
        .route("/users/search", get(users::search_users))
        .route("/users/:user_id", get(users::get_user))
}

/// Group routes
fn group_routes() -> Router<ApiState> {
    Router::new().route("/groups/public", get(groups::get_public_groups))
}
