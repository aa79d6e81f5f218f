//! Payment Repository
//!
//! One payment per ticket, enforced by `payments.ticket_id UNIQUE`.

use super::{RepoError, RepoResult};
use shared::models::{Payment, Ticket, TicketStatus};
use sqlx::SqlitePool;

const PAYMENT_COLUMNS: &str = "id, ticket_id, total_value, is_splitted, created_at";

pub async fn find_by_ticket(pool: &SqlitePool, ticket_id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE ticket_id = ?");
    let payment = sqlx::query_as::<_, Payment>(&sql)
        .bind(ticket_id)
        .fetch_optional(pool)
        .await?;
    Ok(payment)
}

/// Mark the ticket PAID and record its payment in one transaction
///
/// The ticket UPDATE runs first so the transaction takes the write lock before
/// anything else. It only matches while the ticket is unpaid, has no SELECTED
/// or PREPARING orders and its DELIVERED lines still sum to `expected_total`.
/// When it matches nothing the ticket is re-read inside the transaction:
/// already PAID yields [`RepoError::Duplicate`], any other change to its
/// orders yields [`RepoError::Conflict`]. Dropping the transaction rolls back.
pub async fn settle_ticket(
    pool: &SqlitePool,
    ticket_id: i64,
    expected_total: i64,
    total_value: i64,
    is_splitted: bool,
) -> RepoResult<(Ticket, Payment)> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE tickets SET status = 'PAID' \
         WHERE id = ? AND status <> 'PAID' \
         AND NOT EXISTS (SELECT 1 FROM orders WHERE ticket_id = ? AND status IN ('SELECTED', 'PREPARING')) \
         AND (SELECT COALESCE(SUM(total_value), 0) FROM orders WHERE ticket_id = ? AND status = 'DELIVERED') = ?",
    )
    .bind(ticket_id)
    .bind(ticket_id)
    .bind(ticket_id)
    .bind(expected_total)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        let status: Option<TicketStatus> =
            sqlx::query_scalar("SELECT status FROM tickets WHERE id = ?")
                .bind(ticket_id)
                .fetch_optional(&mut *tx)
                .await?;
        return Err(match status {
            None => RepoError::NotFound(format!("Ticket {ticket_id}")),
            Some(TicketStatus::Paid) => {
                RepoError::Duplicate(format!("Ticket {ticket_id} is already paid"))
            }
            Some(_) => RepoError::Conflict(format!(
                "Orders of ticket {ticket_id} changed during checkout"
            )),
        });
    }

    let sql = format!(
        "INSERT INTO payments (ticket_id, total_value, is_splitted, created_at) VALUES (?, ?, ?, ?) RETURNING {PAYMENT_COLUMNS}"
    );
    let payment = sqlx::query_as::<_, Payment>(&sql)
        .bind(ticket_id)
        .bind(total_value)
        .bind(is_splitted)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

    let ticket = sqlx::query_as::<_, Ticket>(
        "SELECT id, user_id, status, created_at FROM tickets WHERE id = ?",
    )
    .bind(ticket_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((ticket, payment))
}
