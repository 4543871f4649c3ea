//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{assignment, completion, events, health, reports, users};
use crate::state::AppState;

// ============================================================================
// Concurrency Limiting Constants
// ============================================================================

/// Maximum concurrent requests for trigger endpoints. The event
/// infrastructure can burst on redelivery.
const TRIGGER_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Users (JWT auth)
/// - `POST /v1/users` - Create profile after external signup
/// - `GET /v1/users/me` - Get current user's profile
///
/// ## Reports (JWT auth)
/// - `POST /v1/reports` - File a waste report (residents)
/// - `GET /v1/reports` - List own/assigned reports
/// - `GET /v1/reports/:id` - Fetch one report
/// - `POST /v1/reports/:id/collect` - Mark collected (assigned worker)
///
/// ## Triggers (Service API key auth)
/// - `POST /v1/triggers/report-created` - Assignment handler
/// - `POST /v1/triggers/report-updated` - Completion handler
///
/// ## Realtime
/// - `GET /v1/events` - WebSocket change-feed stream
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Trigger routes get their own concurrency limit: redeliveries can
    // arrive in bursts and must not starve the client-facing API.
    let trigger_routes = Router::new()
        .route("/report-created", post(assignment::report_created))
        .route("/report-updated", post(completion::report_updated))
        .layer(ConcurrencyLimitLayer::new(TRIGGER_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Users
        .route("/users", post(users::create_profile))
        .route("/users/me", get(users::get_profile))
        // Reports
        .route("/reports", post(reports::create_report))
        .route("/reports", get(reports::list_reports))
        .route("/reports/:id", get(reports::get_report))
        .route("/reports/:id/collect", post(reports::collect_report))
        // Trigger routes (with their own concurrency limit)
        .nest("/triggers", trigger_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS))
        // Realtime feed, added after the limit layer: sockets are
        // long-lived and must not hold API concurrency permits.
        .route("/events", get(events::events));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
