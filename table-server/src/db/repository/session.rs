//! Session Repository
//!
//! Bearer token -> user lookup. Token issuance lives outside this service.

use super::RepoResult;
use super::user::User;
use sqlx::SqlitePool;

pub async fn create(pool: &SqlitePool, token: &str, user_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(token)
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_user_by_token(pool: &SqlitePool, token: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.id, u.name, u.role, u.created_at FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
