//! Handler error types

use crate::coordinator::CoordinatorClosed;
use crate::events::{encode, AuthErrorEvent, ErrorEvent, ServerEvent};
use crate::protocol::CloseCode;
use crate::rooms::JoinError;
use chat_core::DomainError;
use serde_json::Value;
use thiserror::Error;

/// Handler error type
///
/// Everything except a stopped coordinator is reported back to the client as
/// an event and leaves the connection open.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid payload received
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Token rejected or identity unknown
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// Room join refused
    #[error(transparent)]
    Join(#[from] JoinError),

    /// Domain error (from the directory)
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    CoordinatorUnavailable(#[from] CoordinatorClosed),
}

impl HandlerError {
    /// Convert to a close code (if the connection cannot continue)
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::CoordinatorUnavailable(_) => Some(CloseCode::UnknownError),
            _ => None,
        }
    }

    /// Event reporting this error to the client
    pub fn to_event(&self) -> (ServerEvent, Value) {
        match self {
            Self::AuthenticationFailed(_) => {
                let event = AuthErrorEvent {
                    error: "Invalid token".to_string(),
                };
                (ServerEvent::AuthError, encode(ServerEvent::AuthError, &event))
            }
            Self::Domain(DomainError::InternalError(_)) => {
                let event = ErrorEvent::new("Internal error");
                (ServerEvent::Error, encode(ServerEvent::Error, &event))
            }
            _ => {
                let event = ErrorEvent::new(self.to_string());
                (ServerEvent::Error, encode(ServerEvent::Error, &event))
            }
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
