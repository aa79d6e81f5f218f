//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use shared::models::{Order, OrderCreate, OrderWithProduct};

use crate::api::{AppResult, parse_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/chart/add
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.add_order(&user.caller(), payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/chart/{ticketId}
pub async fn cart(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderWithProduct>>> {
    let ticket_id = parse_id(&id, "ticketId")?;
    Ok(Json(state.orders.list_cart(ticket_id).await?))
}

/// GET /api/chart
pub async fn kitchen_queue(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderWithProduct>>> {
    Ok(Json(state.orders.list_preparing(&user.caller()).await?))
}

/// PATCH /api/chart/{orderId}/prepare
pub async fn start_preparing(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order_id = parse_id(&id, "orderId")?;
    Ok(Json(
        state.orders.start_preparing(&user.caller(), order_id).await?,
    ))
}

/// PATCH /api/chart/{orderId}
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order_id = parse_id(&id, "orderId")?;
    Ok(Json(state.orders.deliver(&user.caller(), order_id).await?))
}

/// DELETE /api/chart/{orderId}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order_id = parse_id(&id, "orderId")?;
    Ok(Json(state.orders.delete_order(&user.caller(), order_id).await?))
}
