//! Coordinator
//!
//! A single task owns all live chat state and applies commands in arrival
//! order. Socket tasks talk to it only through a [`CoordinatorHandle`].

mod command;
mod state;

pub use command::Command;
pub use state::Coordinator;

use thiserror::Error;
use tokio::sync::mpsc;

/// The coordinator task has stopped
#[derive(Debug, Clone, Copy, Error)]
#[error("coordinator is not running")]
pub struct CoordinatorClosed;

/// Cloneable sender half of the coordinator's command queue
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    /// Spawn the coordinator loop on the current runtime
    pub fn spawn(coordinator: Coordinator, buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        tokio::spawn(run(coordinator, receiver));

        tracing::info!(buffer = buffer, "Coordinator started");

        Self { sender }
    }

    /// Queue a command, waiting for room in the queue if it is full
    pub async fn send(&self, command: Command) -> Result<(), CoordinatorClosed> {
        self.sender.send(command).await.map_err(|_| CoordinatorClosed)
    }
}

async fn run(mut coordinator: Coordinator, mut receiver: mpsc::Receiver<Command>) {
    while let Some(command) = receiver.recv().await {
        coordinator.apply(command);
    }

    tracing::info!(state = ?coordinator, "Coordinator loop ended");
}
