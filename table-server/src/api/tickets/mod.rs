//! Ticket API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/tickets | POST | Open the caller's ticket, or return the one already open |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::open))
}
