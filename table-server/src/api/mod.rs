//! HTTP routes
//!
//! # Structure
//!
//! - [`health`] - liveness check (public)
//! - [`tickets`] - open or resume a table session
//! - [`chart`] - cart lines and the kitchen queue
//! - [`checkout`] - bulk moves, payment and the paid-ticket archive
//!
//! Every route except `/health` requires a bearer session token, resolved by
//! the [`CurrentUser`](crate::auth::CurrentUser) extractor.

pub mod chart;
pub mod checkout;
pub mod health;
pub mod tickets;

use axum::Router;
use http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::AppResult;
pub(crate) use crate::utils::validation::parse_id;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(tickets::router())
        .merge(chart::router())
        .merge(checkout::router())
}

/// Build the application served by the HTTP server and used by tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = state.config.request_timeout();
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
