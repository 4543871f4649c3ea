//! EcoCollect HTTP API Service.
//!
//! This crate hosts the report lifecycle engine behind an HTTP adapter:
//!
//! - Trigger endpoints for the assignment and completion handlers
//! - An in-process trigger dispatcher driven by the store's change feed
//! - Report and user-profile routes for the mobile client
//! - A WebSocket endpoint streaming change events to devices
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **User JWT tokens** (HS256, shared secret with the identity
//!    service) - for resident/worker requests
//! 2. **Service API keys** - for the trigger infrastructure

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Trigger handlers need async for consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod triggers;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use handlers::TriggerResponse;
pub use routes::create_router;
pub use state::AppState;
pub use triggers::spawn_dispatcher;
