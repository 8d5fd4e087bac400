//! Application configuration structs
//!
//! Loaded from environment variables, with a `.env` file honored if present.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub chat: ChatConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP + WebSocket listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// CORS configuration; an empty list allows any origin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Realtime chat and gateway tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Room every session lands in after authenticating
    pub default_room: String,
    /// Messages kept per room for replay
    pub history_capacity: usize,
    /// Maximum message length in characters
    pub max_message_length: usize,
    pub heartbeat_interval_ms: u64,
    /// Connections silent for longer than this are closed
    pub heartbeat_timeout_ms: u64,
    /// Per-connection outbound queue size
    pub outbound_buffer: usize,
    /// Coordinator command queue size
    pub command_buffer: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_room: "general".to_string(),
            history_capacity: 100,
            max_message_length: 2000,
            heartbeat_interval_ms: 45_000,
            heartbeat_timeout_ms: 90_000,
            outbound_buffer: 100,
            command_buffer: 1024,
        }
    }
}

impl ChatConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    #[must_use]
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-server".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_token_expiry() -> i64 {
    604_800 // 7 days
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `JWT_SECRET` is missing or a variable fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let chat_defaults = ChatConfig::default();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var("APP_ENV", Environment::default())?,
            },
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("PORT", default_port())?,
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                token_expiry: parse_var("JWT_TOKEN_EXPIRY", default_token_expiry())?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID", 0)?,
            },
            chat: ChatConfig {
                default_room: env::var("CHAT_DEFAULT_ROOM").unwrap_or(chat_defaults.default_room),
                history_capacity: parse_var(
                    "CHAT_HISTORY_CAPACITY",
                    chat_defaults.history_capacity,
                )?,
                max_message_length: parse_var(
                    "CHAT_MAX_MESSAGE_LENGTH",
                    chat_defaults.max_message_length,
                )?,
                heartbeat_interval_ms: parse_var(
                    "GATEWAY_HEARTBEAT_INTERVAL_MS",
                    chat_defaults.heartbeat_interval_ms,
                )?,
                heartbeat_timeout_ms: parse_var(
                    "GATEWAY_HEARTBEAT_TIMEOUT_MS",
                    chat_defaults.heartbeat_timeout_ms,
                )?,
                outbound_buffer: parse_var("GATEWAY_OUTBOUND_BUFFER", chat_defaults.outbound_buffer)?,
                command_buffer: parse_var("GATEWAY_COMMAND_BUFFER", chat_defaults.command_buffer)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    ///
    /// # Errors
    /// Returns the first offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snowflake.worker_id > 1023 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                self.snowflake.worker_id.to_string(),
            ));
        }
        if self.chat.history_capacity == 0 {
            return Err(ConfigError::InvalidValue("CHAT_HISTORY_CAPACITY", "0".to_string()));
        }
        if self.chat.outbound_buffer == 0 || self.chat.command_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_OUTBOUND_BUFFER/GATEWAY_COMMAND_BUFFER",
                "0".to_string(),
            ));
        }
        if self.chat.heartbeat_timeout_ms <= self.chat.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_HEARTBEAT_TIMEOUT_MS",
                self.chat.heartbeat_timeout_ms.to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
