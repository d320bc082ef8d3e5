//! Decimal rounding rules for money, stock quantities and unit costs.
//!
//! CRITICAL: Never use floating-point for money or quantities.
//! Every amount in the system is a `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;
/// Decimal places kept for stock quantities.
pub const QUANTITY_SCALE: u32 = 3;
/// Decimal places kept for unit costs.
pub const COST_SCALE: u32 = 4;
/// Total digits of the NUMERIC columns storing money, quantities and costs.
pub const NUMERIC_PRECISION: u32 = 18;

/// A figure does not fit the `NUMERIC(18, scale)` column that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{what} is out of range or has too many decimal places")]
pub struct OutOfRange {
    /// Name of the offending figure.
    pub what: &'static str,
}

/// Returns true if `value` has at most `scale` decimal places and fits a
/// `NUMERIC(18, scale)` column.
#[must_use]
pub fn fits_column(value: Decimal, scale: u32) -> bool {
    let normalized = value.normalize();
    if normalized.scale() > scale {
        return false;
    }
    let limit = Decimal::from(10_u64.pow(NUMERIC_PRECISION - scale));
    normalized.abs() < limit
}

/// Checks an input figure against its column without rounding it.
///
/// # Errors
///
/// Returns `OutOfRange` if the value is too large or too precise.
pub fn ensure_fits(value: Decimal, scale: u32, what: &'static str) -> Result<Decimal, OutOfRange> {
    if fits_column(value, scale) {
        Ok(value)
    } else {
        Err(OutOfRange { what })
    }
}

fn checked(
    value: Option<Decimal>,
    scale: u32,
    what: &'static str,
) -> Result<Decimal, OutOfRange> {
    value
        .map(|v| v.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
        .filter(|v| fits_column(*v, scale))
        .ok_or(OutOfRange { what })
}

/// Rounds the result of a checked operation to cents.
///
/// # Errors
///
/// Returns `OutOfRange` if the operation overflowed (`None`) or the amount
/// does not fit `NUMERIC(18, 2)`.
pub fn checked_money(value: Option<Decimal>, what: &'static str) -> Result<Decimal, OutOfRange> {
    checked(value, MONEY_SCALE, what)
}

/// Rounds the result of a checked operation to a stock quantity.
///
/// # Errors
///
/// Returns `OutOfRange` on overflow or outside `NUMERIC(18, 3)`.
pub fn checked_quantity(value: Option<Decimal>, what: &'static str) -> Result<Decimal, OutOfRange> {
    checked(value, QUANTITY_SCALE, what)
}

/// Rounds the result of a checked operation to a unit cost.
///
/// # Errors
///
/// Returns `OutOfRange` on overflow or outside `NUMERIC(18, 4)`.
pub fn checked_cost(value: Option<Decimal>, what: &'static str) -> Result<Decimal, OutOfRange> {
    checked(value, COST_SCALE, what)
}

/// Rounds a monetary amount to cents, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a stock quantity to three decimal places.
#[must_use]
pub fn round_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
