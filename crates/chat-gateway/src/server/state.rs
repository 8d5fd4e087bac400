//! Gateway state
//!
//! Shared dependencies handed to every socket task.

use crate::coordinator::CoordinatorHandle;
use chat_common::ChatConfig;
use chat_core::{Directory, RoomId, TokenVerifier};
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    directory: Arc<dyn Directory>,
    verifier: Arc<dyn TokenVerifier>,
    /// Queue into the task that owns all live chat state
    coordinator: CoordinatorHandle,
    config: Arc<ChatConfig>,
}

impl GatewayState {
    pub fn new(
        directory: Arc<dyn Directory>,
        verifier: Arc<dyn TokenVerifier>,
        coordinator: CoordinatorHandle,
        config: ChatConfig,
    ) -> Self {
        Self {
            directory,
            verifier,
            coordinator,
            config: Arc::new(config),
        }
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Room every session starts in
    pub fn default_room(&self) -> RoomId {
        RoomId::new(self.config.default_room.as_str())
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("coordinator", &self.coordinator)
            .field("config", &self.config)
            .finish()
    }
}
