//! Ticket Repository

use super::{RepoError, RepoResult};
use shared::models::Ticket;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ticket>> {
    let ticket = sqlx::query_as::<_, Ticket>(
        "SELECT id, user_id, status, created_at FROM tickets WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(ticket)
}

/// The user's non-paid ticket, if any
pub async fn find_active_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Ticket>> {
    let ticket = sqlx::query_as::<_, Ticket>(
        "SELECT id, user_id, status, created_at FROM tickets WHERE user_id = ? AND status <> 'PAID' LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(ticket)
}

/// Create a RESERVED ticket
///
/// The partial unique index on `(user_id) WHERE status <> 'PAID'` rejects a
/// second active ticket with [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, user_id: i64) -> RepoResult<Ticket> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO tickets (user_id, status, created_at) VALUES (?, 'RESERVED', ?) RETURNING id",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ticket".into()))
}
