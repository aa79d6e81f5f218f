//! Order line state machine
//!
//! ```text
//! SELECTED ──start_preparing──▶ PREPARING ──deliver──▶ DELIVERED
//!    │
//!    └── delete (owner only)
//! ```
//!
//! No transition moves backwards.

use shared::error::{AppError, ErrorCode};
use shared::models::{CallerContext, OrderStatus};

/// A single-order forward step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Kitchen picks the order up
    StartPreparing,
    /// Staff serves it to the table
    Deliver,
}

impl Transition {
    pub fn from(self) -> OrderStatus {
        match self {
            Transition::StartPreparing => OrderStatus::Selected,
            Transition::Deliver => OrderStatus::Preparing,
        }
    }

    pub fn to(self) -> OrderStatus {
        match self {
            Transition::StartPreparing => OrderStatus::Preparing,
            Transition::Deliver => OrderStatus::Delivered,
        }
    }

    /// Only staff may trigger either step
    pub fn authorize(self, caller: &CallerContext) -> Result<(), AppError> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(AppError::admin_required())
        }
    }

    /// Error for an order that exists but is not in [`Transition::from`]
    pub fn rejected(self, order_id: i64, current: OrderStatus) -> AppError {
        AppError::with_message(
            ErrorCode::InvalidTransition,
            format!("Order {order_id} is {current}, expected {}", self.from()),
        )
        .with_detail("order_id", order_id)
        .with_detail("status", current.as_str())
    }
}

/// Statuses that a bulk move to `target` picks up
///
/// Only forward moves are allowed: PREPARING takes SELECTED orders, DELIVERED
/// takes SELECTED and PREPARING ones. SELECTED is never a valid target.
pub fn bulk_sources(target: OrderStatus) -> Result<&'static [OrderStatus], AppError> {
    match target {
        OrderStatus::Preparing => Ok(&[OrderStatus::Selected]),
        OrderStatus::Delivered => Ok(&OrderStatus::ACTIVE),
        OrderStatus::Selected => Err(AppError::validation(
            "status must be PREPARING or DELIVERED",
        )
        .with_detail("status", target.as_str())),
    }
}

/// Clients may push their own ticket to the kitchen; everything else needs staff
pub fn authorize_bulk(
    caller: &CallerContext,
    ticket_owner: i64,
    target: OrderStatus,
) -> Result<(), AppError> {
    if caller.is_admin() {
        return Ok(());
    }
    if caller.user_id != ticket_owner {
        return Err(AppError::not_owner("ticket"));
    }
    if target != OrderStatus::Preparing {
        return Err(AppError::admin_required());
    }
    Ok(())
}
