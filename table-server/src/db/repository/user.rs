//! User Repository

use super::{RepoError, RepoResult};
use serde::Serialize;
use shared::models::Role;
use sqlx::SqlitePool;

/// User row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub created_at: i64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, role, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, name: &str, role: Role) -> RepoResult<User> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("User name must not be empty".into()));
    }
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, role, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
