//! # chat-api
//!
//! Account and directory REST API built with Axum: registration, login,
//! profiles, settings, friends and group listings.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::create_app;
pub use state::ApiState;
