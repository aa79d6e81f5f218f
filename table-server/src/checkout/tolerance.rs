//! Payment tolerance band
//!
//! A submitted amount is accepted when it covers the delivered total and does
//! not exceed it by more than 20%. Both ends are inclusive and both sides are
//! compared as whole currency units, rounded half-up.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

/// Largest accepted payment relative to the delivered total (tips, service charge)
pub const MAX_OVERAGE_RATIO: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Round to the nearest integer, halves toward positive infinity
fn round_half_up(value: Decimal) -> Decimal {
    (value + HALF).floor()
}

/// Convert a client-submitted amount to whole currency units
pub fn round_submitted(value: f64) -> Result<i64, AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "totalValue must be a finite number, got {value}"
        )));
    }
    Decimal::from_f64(value)
        .map(round_half_up)
        .and_then(|d| d.to_i64())
        .ok_or_else(|| AppError::validation(format!("totalValue is out of range: {value}")))
}

/// Inclusive `[floor, ceiling]` range of acceptable payments for one ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceBand {
    pub floor: i64,
    pub ceiling: i64,
}

impl ToleranceBand {
    /// Band for a delivered-orders total
    pub fn for_total(total: i64) -> Self {
        let ceiling = round_half_up(Decimal::from(total) * MAX_OVERAGE_RATIO)
            .to_i64()
            .unwrap_or(i64::MAX);
        Self {
            floor: total,
            ceiling,
        }
    }

    pub fn contains(&self, amount: i64) -> bool {
        amount >= self.floor && amount <= self.ceiling
    }

    /// Reject, never clamp, an amount outside the band
    pub fn check(&self, amount: i64) -> Result<(), AppError> {
        if self.contains(amount) {
            return Ok(());
        }
        Err(AppError::with_message(
            ErrorCode::PaymentOutOfRange,
            format!(
                "Payment {amount} is outside the accepted range [{}, {}]",
                self.floor, self.ceiling
            ),
        )
        .with_detail("submitted", amount)
        .with_detail("min", self.floor)
        .with_detail("max", self.ceiling))
    }
}
