//! Cart ("chart") API
//!
//! | Path | Method | Description | Who |
//! |------|--------|-------------|-----|
//! | /api/chart/add | POST | Add a line to a ticket | ticket owner |
//! | /api/chart | GET | Kitchen queue (PREPARING lines) | admin |
//! | /api/chart/{id} | GET | SELECTED lines of ticket `id` | any user |
//! | /api/chart/{id} | PATCH | Deliver order `id` | admin |
//! | /api/chart/{id} | DELETE | Remove SELECTED order `id` | ticket owner |
//! | /api/chart/{id}/prepare | PATCH | Start preparing order `id` | admin |
//!
//! Path ids arrive as text so a malformed one is a 422 instead of the
//! router's plain 400.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/chart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::kitchen_queue))
        .route("/add", post(handler::add))
        .route(
            "/{id}",
            get(handler::cart)
                .patch(handler::deliver)
                .delete(handler::delete),
        )
        .route("/{id}/prepare", patch(handler::start_preparing))
}
