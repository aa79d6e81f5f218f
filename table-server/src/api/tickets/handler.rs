//! Ticket API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use shared::models::Ticket;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/tickets - 201 when a new ticket was opened, 200 when resumed
pub async fn open(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let (ticket, created) = state.tickets.open_for(&user.caller()).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ticket)))
}
