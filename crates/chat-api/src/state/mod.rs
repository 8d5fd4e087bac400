//! Application state
//!
//! Holds the account store, the directory and the token issuer shared by
//! every handler.

use std::sync::Arc;

use chat_common::JwtService;
use chat_core::{AccountStore, Directory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct ApiState {
    accounts: Arc<dyn AccountStore>,
    directory: Arc<dyn Directory>,
    jwt_service: Arc<JwtService>,
}

impl ApiState {
    /// Create a new ApiState
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        directory: Arc<dyn Directory>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            accounts,
            directory,
            jwt_service,
        }
    }

    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}
