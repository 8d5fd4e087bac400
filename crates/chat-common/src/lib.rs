//! # chat-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, verify_credentials, verify_password, Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, ChatConfig, ConfigError, CorsConfig, Environment, JwtConfig,
    ServerConfig, SnowflakeConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
