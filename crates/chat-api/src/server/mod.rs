//! Application builder

use axum::Router;
use chat_common::CorsConfig;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::ApiState;

/// Build the REST application with all routes and middleware
pub fn create_app(state: ApiState, cors: &CorsConfig, is_production: bool) -> Router {
    apply_middleware(create_router(), cors, is_production).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chat_common::JwtService;
    use chat_core::SnowflakeGenerator;
    use chat_directory::InMemoryDirectory;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let directory = Arc::new(InMemoryDirectory::new(Arc::new(SnowflakeGenerator::new(0))));
        let jwt = Arc::new(JwtService::new("test-secret", 3600));
        let state = ApiState::new(directory.clone(), directory, jwt);
        create_app(state, &CorsConfig::default(), false)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(app: &Router, username: &str) -> (String, serde_json::Value) {
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/auth/register",
                &serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "secret123",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (body["token"].as_str().unwrap().to_string(), body["user"].clone())
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_then_me() {
        let app = app();
        let (token, user) = register(&app, "alice").await;
        assert_eq!(user["username"], "alice");
        assert_eq!(user["bio"], "");
        assert_eq!(user["settings"]["notifications"], true);

        let (status, me) = send(&app, get_with_token("/api/v1/users/@me", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], user["id"]);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/register",
                &serde_json::json!({
                    "username": "ALICE",
                    "email": "other@example.com",
                    "password": "secret123",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn test_login() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                &serde_json::json!({"email": "alice@example.com", "password": "secret123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                &serde_json::json!({"email": "alice@example.com", "password": "wrong-password"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                &serde_json::json!({"email": "nobody@example.com", "password": "secret123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validation_error_details() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/register",
                &serde_json::json!({"username": "a", "email": "a@example.com", "password": "123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"].is_object());
    }

    #[tokio::test]
    async fn test_missing_token() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::get("/api/v1/users/@me").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");

        let (status, _) = send(&app, get_with_token("/api/v1/users/@me", "garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_and_settings_update() {
        let app = app();
        let (token, _) = register(&app, "alice").await;

        let request = Request::patch("/api/v1/users/@me")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"bio": "hello"}"#))
            .unwrap();
        let (status, user) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["bio"], "hello");
        assert_eq!(user["username"], "alice");

        let request = Request::patch("/api/v1/users/@me/settings")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"darkMode": true}"#))
            .unwrap();
        let (status, user) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["settings"]["darkMode"], true);
        assert_eq!(user["settings"]["soundEnabled"], true);
    }

    #[tokio::test]
    async fn test_search_excludes_caller() {
        let app = app();
        let (token, _) = register(&app, "alice").await;
        register(&app, "alicia").await;
        register(&app, "bob").await;

        let (status, users) = send(&app, get_with_token("/api/v1/users/search?q=ali", &token)).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = users
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["alicia"]);
    }

    #[tokio::test]
    async fn test_public_user_and_groups() {
        let app = app();
        let (token, _) = register(&app, "alice").await;
        let (_, bob) = register(&app, "bob").await;

        let uri = format!("/api/v1/users/{}", bob["id"].as_str().unwrap());
        let (status, body) = send(&app, get_with_token(&uri, &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "bob");
        assert!(body.get("email").is_none());

        let (status, _) = send(&app, get_with_token("/api/v1/users/not-a-number", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, groups) = send(&app, get_with_token("/api/v1/groups/public", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(groups
            .as_array()
            .unwrap()
            .iter()
            .any(|g| g["id"] == "general"));

        let (status, friends) = send(&app, get_with_token("/api/v1/users/@me/friends", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(friends, serde_json::json!([]));
    }
}
