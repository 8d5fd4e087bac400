//! API Integration Tests
//!
//! Each test starts its own in-process server on a loopback port.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert!(!auth.token.is_empty());
    assert!(auth.user.avatar.starts_with('#'));
    assert!(auth.user.bio.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/api/v1/auth/register", &request).await.unwrap();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_short_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.password = "12345".to_string();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (request, registered) = server.register_unique().await.unwrap();

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.id, registered.user.id);
    assert!(!auth.token.is_empty());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = server.register_unique().await.unwrap();

    let login = LoginRequest {
        email: request.email,
        password: "WrongPassword!".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = server.register_unique().await.unwrap();

    let response = server.get_auth("/api/v1/users/@me", &auth.token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.email.as_deref(), Some(request.email.as_str()));
}

#[tokio::test]
async fn test_get_current_user_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/users/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/v1/users/@me", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_update_profile_and_settings() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server
        .patch_auth("/api/v1/users/@me", &auth.token, &json!({ "bio": "hello there" }))
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user["bio"], "hello there");

    let response = server
        .patch_auth(
            "/api/v1/users/@me/settings",
            &auth.token,
            &json!({ "darkMode": true }),
        )
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(
        user["settings"],
        json!({ "darkMode": true, "notifications": true, "soundEnabled": true })
    );
}

#[tokio::test]
async fn test_search_users() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let path = format!("/api/v1/users/search?q={}", bob.user.username);
    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let users: Vec<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, bob.user.id);

    // The caller never finds themselves
    let path = format!("/api/v1/users/search?q={}", alice.user.username);
    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let users: Vec<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(users.iter().all(|u| u.id != alice.user.id));
}

#[tokio::test]
async fn test_get_public_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let path = format!("/api/v1/users/{}", bob.user.id);
    let response = server.get_auth(&path, &alice.token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, bob.user.username);
    assert!(user.email.is_none());

    let response = server
        .get_auth("/api/v1/users/123456789", &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Group Tests
// ============================================================================

#[tokio::test]
async fn test_public_groups_include_general() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server
        .get_auth("/api/v1/groups/public", &auth.token)
        .await
        .unwrap();
    let groups: Vec<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let general = groups.iter().find(|g| g.id == "general").expect("general listed");
    assert_eq!(general.kind, "public");
    assert!(general.is_admin.is_none());
}
