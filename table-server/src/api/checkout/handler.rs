//! Checkout API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::models::{FinishOrdersBody, OrderWithProduct, PaymentBody};

use crate::api::{AppResult, parse_id};
use crate::auth::CurrentUser;
use crate::checkout::CheckoutReceipt;
use crate::core::ServerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedOrders {
    pub ticket_id: i64,
    pub moved: u64,
}

/// PUT /api/checkout
pub async fn mark_orders_finished(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FinishOrdersBody>,
) -> AppResult<Json<MovedOrders>> {
    let moved = state
        .checkout
        .mark_orders_finished(&user.caller(), payload.ticket_id, payload.status)
        .await?;
    Ok(Json(MovedOrders {
        ticket_id: payload.ticket_id,
        moved,
    }))
}

/// GET /api/checkout/{ticketId}
pub async fn finished_orders(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderWithProduct>>> {
    let ticket_id = parse_id(&id, "ticketId")?;
    Ok(Json(state.checkout.list_finished_orders(ticket_id).await?))
}

/// POST /api/checkout/{ticketId}
///
/// The payer name forwarded to the staff call is the caller's display name.
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PaymentBody>,
) -> AppResult<Json<CheckoutReceipt>> {
    let ticket_id = parse_id(&id, "ticketId")?;
    let receipt = state
        .checkout
        .pay_and_close(&user.caller(), ticket_id, &payload, &user.name)
        .await?;
    Ok(Json(receipt))
}

/// GET /api/checkout
pub async fn paid_tickets(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Map<String, Value>>>> {
    Ok(Json(state.checkout.list_paid_tickets(&user.caller()).await?))
}
