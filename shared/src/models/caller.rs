//! Caller identity, threaded explicitly into every service call

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    /// Customer seated at a table
    Client,
    /// Restaurant staff
    Admin,
}

/// Who is calling, as resolved by the session collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub user_id: i64,
    pub role: Role,
}

impl CallerContext {
    pub fn client(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Client,
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins act on any ticket, clients only on their own
    pub fn can_act_for(&self, owner_id: i64) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}
