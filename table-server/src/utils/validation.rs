//! Input validation helpers

use shared::models::OrderCreate;

use crate::utils::AppError;

/// Free-text order modifiers ("no onions, extra cheese")
pub const MAX_OPTIONALS_LEN: usize = 500;

/// Per-line quantity cap
pub const MAX_AMOUNT: i32 = 999;

/// Per-line price cap in currency units; keeps ticket sums far from `i64::MAX`
pub const MAX_LINE_VALUE: i64 = 1_000_000_000;

/// Parse a path/body identifier; anything but a positive integer is unprocessable
pub fn parse_id(raw: &str, field: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid_id(field, raw)),
    }
}

/// Validate an add-to-cart payload before it reaches the store
pub fn validate_order_create(data: &OrderCreate) -> Result<(), AppError> {
    if data.ticket_id <= 0 {
        return Err(AppError::invalid_id("ticketId", &data.ticket_id.to_string()));
    }
    if data.product_id <= 0 {
        return Err(AppError::invalid_id("productId", &data.product_id.to_string()));
    }
    if !(1..=MAX_AMOUNT).contains(&data.amount) {
        return Err(AppError::validation(format!(
            "amount must be between 1 and {MAX_AMOUNT}, got {}",
            data.amount
        )));
    }
    if !(0..=MAX_LINE_VALUE).contains(&data.total_value) {
        return Err(AppError::validation(format!(
            "totalValue must be between 0 and {MAX_LINE_VALUE}, got {}",
            data.total_value
        )));
    }
    if let Some(v) = &data.optionals
        && v.len() > MAX_OPTIONALS_LEN
    {
        return Err(AppError::validation(format!(
            "optionals is too long ({} chars, max {MAX_OPTIONALS_LEN})",
            v.len()
        )));
    }
    Ok(())
}
