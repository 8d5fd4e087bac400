//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("testuser{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
}

/// Entry of `GET /users/@me/friend-requests`
#[derive(Debug, Deserialize)]
pub struct FriendRequestResponse {
    pub id: String,
    pub from: UserResponse,
    pub timestamp: String,
}

/// Group summary as listed by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub member_count: usize,
    #[serde(default)]
    pub is_admin: Option<bool>,
}
