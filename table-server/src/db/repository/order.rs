//! Order Repository
//!
//! Status changes are compare-and-set: every UPDATE/DELETE names the status it
//! expects, so a concurrent transition makes the second writer affect zero rows.

use super::{RepoError, RepoResult, placeholders};
use shared::models::{Order, OrderCreate, OrderStatus, OrderWithProduct};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str =
    "id, ticket_id, product_id, amount, total_value, optionals, status, created_at";

const ORDER_WITH_PRODUCT_SELECT: &str = "SELECT o.id, o.ticket_id, o.product_id, o.amount, o.total_value, o.optionals, o.status, o.created_at, p.name AS product_name, p.description AS product_description, p.image AS product_image FROM orders o JOIN products p ON p.id = o.product_id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Orders of one ticket whose status is in `statuses`, with product metadata
pub async fn find_by_ticket_and_status(
    pool: &SqlitePool,
    ticket_id: i64,
    statuses: &[OrderStatus],
) -> RepoResult<Vec<OrderWithProduct>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{ORDER_WITH_PRODUCT_SELECT} WHERE o.ticket_id = ? AND o.status IN ({}) ORDER BY o.id",
        placeholders(statuses.len())
    );
    let mut query = sqlx::query_as::<_, OrderWithProduct>(&sql).bind(ticket_id);
    for status in statuses {
        query = query.bind(*status);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Orders across all tickets whose status is in `statuses`, oldest first
pub async fn find_by_status(
    pool: &SqlitePool,
    statuses: &[OrderStatus],
) -> RepoResult<Vec<OrderWithProduct>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{ORDER_WITH_PRODUCT_SELECT} WHERE o.status IN ({}) ORDER BY o.created_at, o.id",
        placeholders(statuses.len())
    );
    let mut query = sqlx::query_as::<_, OrderWithProduct>(&sql);
    for status in statuses {
        query = query.bind(*status);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Insert a new SELECTED order line
///
/// The insert only happens while the ticket is unpaid; a ticket settled in the
/// meantime yields [`RepoError::Conflict`].
pub async fn create(pool: &SqlitePool, data: &OrderCreate) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO orders (ticket_id, product_id, amount, total_value, optionals, status, created_at) \
         SELECT ?, ?, ?, ?, ?, 'SELECTED', ? \
         WHERE EXISTS (SELECT 1 FROM tickets WHERE id = ? AND status <> 'PAID') \
         RETURNING id",
    )
    .bind(data.ticket_id)
    .bind(data.product_id)
    .bind(data.amount)
    .bind(data.total_value)
    .bind(&data.optionals)
    .bind(now)
    .bind(data.ticket_id)
    .fetch_optional(pool)
    .await?;

    let Some(id) = id else {
        return Err(RepoError::Conflict(format!(
            "Ticket {} is paid or missing",
            data.ticket_id
        )));
    };

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Move one order `from -> to`; returns false when the order is missing or not in `from`
pub async fn transition(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Move every order of a ticket currently in `from` to `to`; returns the count moved
pub async fn update_status_by_ticket(
    pool: &SqlitePool,
    ticket_id: i64,
    from: &[OrderStatus],
    to: OrderStatus,
) -> RepoResult<u64> {
    if from.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "UPDATE orders SET status = ? WHERE ticket_id = ? AND status IN ({})",
        placeholders(from.len())
    );
    let mut query = sqlx::query(&sql).bind(to).bind(ticket_id);
    for status in from {
        query = query.bind(*status);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Delete an order only while it is still SELECTED
pub async fn delete_selected(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ? AND status = 'SELECTED'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}
