//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use chat_common::{
    AppConfig, AppSettings, ChatConfig, CorsConfig, Environment, JwtConfig, ServerConfig,
    SnowflakeConfig,
};
use chat_gateway::create_combined_app;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{AuthResponse, RegisterRequest};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let app = create_combined_app(&config);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket gateway URL
    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Register a fresh account and return its token and user
    pub async fn register_unique(&self) -> Result<(RegisterRequest, AuthResponse)> {
        let request = RegisterRequest::unique();
        let response = self.post("/api/v1/auth/register", &request).await?;
        let auth = assert_json(response, StatusCode::CREATED).await?;
        Ok((request, auth))
    }
}

/// Configuration for an isolated in-process server
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "chat-server-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            token_expiry: 3600,
        },
        cors: CorsConfig::default(),
        snowflake: SnowflakeConfig::default(),
        chat: ChatConfig::default(),
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
