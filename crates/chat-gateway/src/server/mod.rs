//! Gateway server setup
//!
//! Builds the WebSocket router, wires the coordinator, and serves it next to
//! the REST API from one listener.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::coordinator::{Coordinator, CoordinatorHandle};
use axum::{routing::get, Router};
use chat_api::ApiState;
use chat_common::{AppConfig, AppError, ChatConfig, JwtService};
use chat_core::{Directory, SnowflakeGenerator, TokenVerifier};
use chat_directory::InMemoryDirectory;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new().route("/gateway", get(gateway_handler))
}

/// Build the gateway application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Spawn the coordinator and bundle it with the socket dependencies
pub fn create_gateway_state(
    config: &ChatConfig,
    directory: Arc<dyn Directory>,
    verifier: Arc<dyn TokenVerifier>,
    ids: Arc<SnowflakeGenerator>,
) -> GatewayState {
    let coordinator = Coordinator::new(config, ids);
    let handle = CoordinatorHandle::spawn(coordinator, config.command_buffer);
    GatewayState::new(directory, verifier, handle, config.clone())
}

/// REST API and gateway sharing one directory and token issuer
pub fn create_combined_app(config: &AppConfig) -> Router {
    let ids = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let directory = Arc::new(InMemoryDirectory::new(ids.clone()));
    let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.token_expiry));

    let api_state = ApiState::new(directory.clone(), directory.clone(), jwt.clone());
    let gateway_state = create_gateway_state(&config.chat, directory, jwt, ids);

    chat_api::create_app(api_state, &config.cors, config.app.env.is_production())
        .merge(create_app(gateway_state))
}

/// Run the server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let app = create_combined_app(&config);

    run_server(app, addr).await
}
