//! Checkout reconciliation
//!
//! Decides when a ticket may be paid, validates the submitted amount against
//! the delivered orders, settles the ticket and hands the side effects to the
//! follow-up worker.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ArchivedOrder, CallerContext, FinishedTicketSnapshot, OrderStatus, OrderWithProduct, Payment,
    PaymentBody, Ticket,
};
use tokio::sync::mpsc;

use super::follow_up::SettlementEvent;
use super::tolerance::{ToleranceBand, round_submitted};
use crate::db::repository::RepoError;
use crate::orders::lifecycle::{authorize_bulk, bulk_sources};
use crate::stores::{ArchiveStore, OrderStore, PaymentStore, TicketStore};
use crate::utils::AppResult;

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub ticket: Ticket,
    pub payment: Payment,
}

#[derive(Clone)]
pub struct CheckoutEngine {
    tickets: Arc<dyn TicketStore>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
    archive: Arc<dyn ArchiveStore>,
    follow_up: mpsc::Sender<SettlementEvent>,
}

impl CheckoutEngine {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
        archive: Arc<dyn ArchiveStore>,
        follow_up: mpsc::Sender<SettlementEvent>,
    ) -> Self {
        Self {
            tickets,
            orders,
            payments,
            archive,
            follow_up,
        }
    }

    async fn ticket(&self, ticket_id: i64) -> AppResult<Ticket> {
        self.tickets
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::ticket_not_found(ticket_id))
    }

    /// Move every order of the ticket that precedes `target` forward to it
    ///
    /// Returns how many orders moved. A ticket with nothing to move is an
    /// authorization failure rather than a no-op.
    pub async fn mark_orders_finished(
        &self,
        caller: &CallerContext,
        ticket_id: i64,
        target: OrderStatus,
    ) -> AppResult<u64> {
        let sources = bulk_sources(target)?;
        let ticket = self.ticket(ticket_id).await?;
        authorize_bulk(caller, ticket.user_id, target)?;
        if !ticket.status.is_active() {
            return Err(already_paid(ticket_id));
        }

        let moved = self
            .orders
            .update_orders_status(ticket_id, sources, target)
            .await?;
        if moved == 0 {
            tracing::warn!(ticket_id, %target, "No actionable orders on ticket");
            return Err(AppError::with_message(
                ErrorCode::NoActionableOrders,
                format!("Ticket {ticket_id} has no orders to move to {target}"),
            ));
        }

        tracing::info!(ticket_id, %target, moved, "Orders moved forward");
        Ok(moved)
    }

    /// DELIVERED orders of a ticket, for review before paying
    pub async fn list_finished_orders(&self, ticket_id: i64) -> AppResult<Vec<OrderWithProduct>> {
        self.ticket(ticket_id).await?;
        Ok(self
            .orders
            .orders_by_ticket_and_status(ticket_id, &[OrderStatus::Delivered])
            .await?)
    }

    /// Validate the payment, settle the ticket and queue its follow-ups
    ///
    /// Every check runs before the single settling transaction; the staff call
    /// and archive write happen afterwards on the follow-up worker.
    pub async fn pay_and_close(
        &self,
        caller: &CallerContext,
        ticket_id: i64,
        body: &PaymentBody,
        payer_name: &str,
    ) -> AppResult<CheckoutReceipt> {
        let ticket = self.ticket(ticket_id).await?;
        if !caller.can_act_for(ticket.user_id) {
            return Err(AppError::not_owner("ticket"));
        }
        if !ticket.status.is_active() {
            return Err(already_paid(ticket_id));
        }

        let delivered = self
            .orders
            .orders_by_ticket_and_status(ticket_id, &[OrderStatus::Delivered])
            .await?;
        if delivered.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::NothingToCharge,
                format!("Ticket {ticket_id} has no delivered orders"),
            ));
        }

        let active = self
            .orders
            .orders_by_ticket_and_status(ticket_id, &OrderStatus::ACTIVE)
            .await?;
        if !active.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::UnfulfilledOrders,
                format!("Ticket {ticket_id} still has {} unfulfilled orders", active.len()),
            )
            .with_detail("pending", active.len()));
        }

        let total = delivered_total(ticket_id, &delivered)?;
        let submitted = round_submitted(body.total_value)?;
        let band = ToleranceBand::for_total(total);
        if let Err(e) = band.check(submitted) {
            tracing::warn!(ticket_id, total, submitted, ceiling = band.ceiling, "Payment outside tolerance band");
            return Err(e);
        }

        let (ticket, payment) = self
            .payments
            .settle_ticket(ticket_id, total, submitted, body.is_splitted)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => already_paid(ticket_id),
                RepoError::Conflict(_) => {
                    tracing::warn!(ticket_id, total, "Orders changed during checkout, nothing charged");
                    AppError::with_message(
                        ErrorCode::UnfulfilledOrders,
                        format!("Orders of ticket {ticket_id} changed during checkout, review and pay again"),
                    )
                }
                other => other.into(),
            })?;
        tracing::info!(
            ticket_id,
            payment_id = payment.id,
            total,
            charged = payment.total_value,
            split = payment.is_splitted,
            "Ticket paid"
        );

        let snapshot = FinishedTicketSnapshot::new(
            &ticket,
            delivered.into_iter().map(archived_order).collect(),
            payment.clone(),
            payer_name,
            shared::util::now_millis(),
        );
        let event = SettlementEvent {
            snapshot,
            split: payment.is_splitted,
        };
        if let Err(e) = self.follow_up.try_send(event) {
            tracing::error!(ticket_id, error = %e, "Follow-up queue unavailable, staff call and archive skipped");
        }

        Ok(CheckoutReceipt { ticket, payment })
    }

    /// Archived snapshots of paid tickets; staff only
    pub async fn list_paid_tickets(
        &self,
        caller: &CallerContext,
    ) -> AppResult<Vec<Map<String, Value>>> {
        if !caller.is_admin() {
            return Err(AppError::forbidden("Only staff can list paid tickets"));
        }
        Ok(self.archive.list_finished_tickets().await?)
    }
}

fn already_paid(ticket_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::TicketAlreadyPaid,
        format!("Ticket {ticket_id} is already paid"),
    )
    .with_detail("ticket_id", ticket_id)
}

/// Sum of delivered lines; an overflowing sum is rejected, never wrapped
fn delivered_total(ticket_id: i64, delivered: &[OrderWithProduct]) -> AppResult<i64> {
    delivered
        .iter()
        .try_fold(0i64, |acc, o| acc.checked_add(o.order.total_value))
        .ok_or_else(|| {
            AppError::validation(format!("Delivered total of ticket {ticket_id} is out of range"))
        })
}

fn archived_order(row: OrderWithProduct) -> ArchivedOrder {
    let order = row.order;
    ArchivedOrder {
        order_id: order.id,
        product_id: order.product_id,
        product_name: row.product_name,
        amount: order.amount,
        total_value: order.total_value,
        optionals: order.optionals,
        status: order.status,
        created_at: order.created_at,
    }
}
