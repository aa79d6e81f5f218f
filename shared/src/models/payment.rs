//! Payment Model

use serde::{Deserialize, Serialize};

/// Payment record, written once per ticket at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub ticket_id: i64,
    /// Amount actually charged, integer currency units
    pub total_value: i64,
    /// Bill divided among several payers
    pub is_splitted: bool,
    /// Unix millis
    pub created_at: i64,
}

/// Client-submitted checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    /// Amount the client intends to pay; rounded to the nearest unit before comparison
    pub total_value: f64,
    #[serde(default)]
    pub is_splitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_body_defaults_split_flag() {
        let body: PaymentBody = serde_json::from_str(r#"{"totalValue":120.4}"#).unwrap();
        assert_eq!(body.total_value, 120.4);
        assert!(!body.is_splitted);
    }
}
