//! # chat-directory
//!
//! In-memory implementation of the [`Directory`](chat_core::Directory) and
//! [`AccountStore`](chat_core::AccountStore) traits defined in `chat-core`.
//!
//! Holds registered accounts, groups and the friend graph for the lifetime of the
//! process. Nothing is persisted across restarts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chat_core::SnowflakeGenerator;
//! use chat_directory::InMemoryDirectory;
//!
//! let directory = Arc::new(InMemoryDirectory::new(Arc::new(SnowflakeGenerator::new(0))));
//! ```

mod accounts;
mod directory;
mod store;

pub use store::InMemoryDirectory;
