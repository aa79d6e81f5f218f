//! Checkout API
//!
//! | Path | Method | Description | Who |
//! |------|--------|-------------|-----|
//! | /api/checkout | PUT | Move a ticket's orders forward in bulk | owner (PREPARING) / admin |
//! | /api/checkout | GET | Archived paid tickets | admin |
//! | /api/checkout/{ticketId} | GET | DELIVERED lines awaiting payment | any user |
//! | /api/checkout/{ticketId} | POST | Pay and close the ticket | owner / admin |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::paid_tickets).put(handler::mark_orders_finished),
        )
        .route("/{id}", get(handler::finished_orders).post(handler::pay))
}
