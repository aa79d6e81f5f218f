//! Ticket Model (one table session)

use serde::{Deserialize, Serialize};

/// Ticket status
///
/// A ticket is active until it is paid. Paid is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TicketStatus {
    /// Table is seated and ordering
    Reserved,
    /// Checkout completed
    Paid,
}

impl TicketStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, TicketStatus::Paid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Reserved => "RESERVED",
            TicketStatus::Paid => "PAID",
        }
    }
}

/// Ticket entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub status: TicketStatus,
    /// Unix millis
    pub created_at: i64,
}

impl Ticket {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}
