//! Finished ticket archive record
//!
//! Typed inside the service, flattened to a schema-less JSON object only at the
//! archive store boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OrderStatus, Payment, Ticket, TicketStatus};

/// Current layout of [`FinishedTicketSnapshot`] records
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// One archived order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedOrder {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub amount: i32,
    pub total_value: i64,
    pub optionals: Option<String>,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Denormalized copy of a paid ticket (ticket + orders + payment)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTicketSnapshot {
    pub schema_version: u32,
    pub ticket_id: i64,
    pub user_id: i64,
    pub ticket_status: TicketStatus,
    pub opened_at: i64,
    pub payer_name: String,
    pub orders: Vec<ArchivedOrder>,
    /// Sum of delivered order lines
    pub orders_total: i64,
    pub payment: Payment,
    pub archived_at: i64,
}

impl FinishedTicketSnapshot {
    pub fn new(
        ticket: &Ticket,
        orders: Vec<ArchivedOrder>,
        payment: Payment,
        payer_name: impl Into<String>,
        archived_at: i64,
    ) -> Self {
        let orders_total = orders
            .iter()
            .fold(0i64, |acc, o| acc.saturating_add(o.total_value));
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            ticket_id: ticket.id,
            user_id: ticket.user_id,
            ticket_status: ticket.status,
            opened_at: ticket.created_at,
            payer_name: payer_name.into(),
            orders,
            orders_total,
            payment,
            archived_at,
        }
    }

    /// Flatten into the field -> value mapping the archive store accepts
    pub fn to_record(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            // a struct always serializes to an object
            other => Ok(Map::from_iter([("snapshot".to_string(), other)])),
        }
    }

    /// Read a record back; fails for records written with another layout
    pub fn from_record(record: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }
}
