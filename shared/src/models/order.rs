//! Order Model (one product line inside a ticket)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order line status
///
/// Moves strictly forward: `SELECTED -> PREPARING -> DELIVERED`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// In the cart, editable and deletable by its owner
    Selected,
    /// Kitchen is working on it
    Preparing,
    /// Served, counted toward the checkout total
    Delivered,
}

impl OrderStatus {
    /// Statuses that still block a checkout
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Selected, OrderStatus::Preparing];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Selected => "SELECTED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub ticket_id: i64,
    pub product_id: i64,
    /// Quantity
    pub amount: i32,
    /// Line price in integer currency units (amount x unit price)
    pub total_value: i64,
    /// Free-text modifiers ("no onions")
    pub optionals: Option<String>,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
}

/// Order enriched with product display metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithProduct {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub order: Order,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_image: Option<String>,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub ticket_id: i64,
    pub product_id: i64,
    pub amount: i32,
    pub total_value: i64,
    pub optionals: Option<String>,
}

/// Bulk forward-transition payload for one ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishOrdersBody {
    pub ticket_id: i64,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_follows_lifecycle() {
        assert!(OrderStatus::Selected < OrderStatus::Preparing);
        assert!(OrderStatus::Preparing < OrderStatus::Delivered);
    }

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::ACTIVE.contains(&OrderStatus::Selected));
        assert!(OrderStatus::ACTIVE.contains(&OrderStatus::Preparing));
        assert!(!OrderStatus::ACTIVE.contains(&OrderStatus::Delivered));
    }

    #[test]
    fn test_order_with_product_flattens() {
        let row = OrderWithProduct {
            order: Order {
                id: 7,
                ticket_id: 3,
                product_id: 11,
                amount: 2,
                total_value: 3000,
                optionals: Some("no ice".into()),
                status: OrderStatus::Delivered,
                created_at: 1,
            },
            product_name: "Lemonade".into(),
            product_description: None,
            product_image: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["ticketId"], 3);
        assert_eq!(json["totalValue"], 3000);
        assert_eq!(json["status"], "DELIVERED");
        assert_eq!(json["productName"], "Lemonade");
    }

    #[test]
    fn test_finish_body_rejects_unknown_status() {
        let body = serde_json::from_str::<FinishOrdersBody>(r#"{"ticketId":1,"status":"unknown"}"#);
        assert!(body.is_err());
    }
}
