//! Custom `validator` rules for decimal fields.
//!
//! Each rule also checks that the value fits the `NUMERIC` column it is
//! stored in, so oversize or over-precise figures are refused with a 400
//! before any arithmetic runs on them.

use comptoir_shared::types::{COST_SCALE, MONEY_SCALE, QUANTITY_SCALE, fits_column};
use rust_decimal::Decimal;
use validator::ValidationError;

fn fail(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn is_negative(value: &Decimal) -> bool {
    value.is_sign_negative() && !value.is_zero()
}

fn fits(value: &Decimal, scale: u32) -> Result<(), ValidationError> {
    if fits_column(*value, scale) {
        Ok(())
    } else {
        Err(fail("out_of_range", "is too large or has too many decimal places"))
    }
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(fail("positive", "must be greater than zero"))
    }
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if is_negative(value) {
        Err(fail("non_negative", "cannot be negative"))
    } else {
        Ok(())
    }
}

/// Non-negative amount in `NUMERIC(18, 2)`.
///
/// # Errors
///
/// Fails for negative, oversize or sub-cent values.
pub fn money(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    fits(value, MONEY_SCALE)
}

/// Strictly positive amount in `NUMERIC(18, 2)`.
///
/// # Errors
///
/// Fails for zero, negative, oversize or sub-cent values.
pub fn positive_money(value: &Decimal) -> Result<(), ValidationError> {
    positive(value)?;
    fits(value, MONEY_SCALE)
}

/// Non-negative unit cost in `NUMERIC(18, 4)`.
///
/// # Errors
///
/// Fails for negative, oversize or over-precise values.
pub fn cost(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    fits(value, COST_SCALE)
}

/// Non-negative stock quantity in `NUMERIC(18, 3)`.
///
/// # Errors
///
/// Fails for negative, oversize or over-precise values.
pub fn quantity(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    fits(value, QUANTITY_SCALE)
}

/// Strictly positive stock quantity in `NUMERIC(18, 3)`.
///
/// # Errors
///
/// Fails for zero, negative, oversize or over-precise values.
pub fn positive_quantity(value: &Decimal) -> Result<(), ValidationError> {
    positive(value)?;
    fits(value, QUANTITY_SCALE)
}

/// Signed stock movement in `NUMERIC(18, 3)`.
///
/// # Errors
///
/// Fails for oversize or over-precise values.
pub fn stock_delta(value: &Decimal) -> Result<(), ValidationError> {
    fits(value, QUANTITY_SCALE)
}

/// Between 0 and 100 inclusive, two decimals at most.
///
/// # Errors
///
/// Fails outside `0..=100` or below a hundredth.
pub fn percent(value: &Decimal) -> Result<(), ValidationError> {
    if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(value) {
        return Err(fail("percent", "must be between 0 and 100"));
    }
    fits(value, MONEY_SCALE)
}

/// Overtime hours: `NUMERIC(5, 2)`, not negative.
///
/// # Errors
///
/// Fails for negative values, 1000 or more, or below a hundredth.
pub fn hours(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    small(value)
}

/// Overtime multiplier: `NUMERIC(5, 2)`, strictly positive.
///
/// # Errors
///
/// Fails for zero, negative values, 1000 or more, or below a hundredth.
pub fn multiplier(value: &Decimal) -> Result<(), ValidationError> {
    positive(value)?;
    small(value)
}

fn small(value: &Decimal) -> Result<(), ValidationError> {
    if value.abs() >= Decimal::ONE_THOUSAND {
        return Err(fail("out_of_range", "must be less than 1000"));
    }
    fits(value, MONEY_SCALE)
}
