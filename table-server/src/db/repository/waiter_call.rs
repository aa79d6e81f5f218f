//! Waiter Call Repository
//!
//! A row here is a request for staff to come to the table.

use super::RepoResult;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaiterCall {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: i64,
}

pub async fn create(pool: &SqlitePool, user_id: i64, name: &str) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO waiter_calls (user_id, name, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<WaiterCall>> {
    let calls = sqlx::query_as::<_, WaiterCall>(
        "SELECT id, user_id, name, created_at FROM waiter_calls WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(calls)
}
