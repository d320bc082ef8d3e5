//! Employee and attendance validation.

use chrono::NaiveDate;
use comptoir_shared::types::{MONEY_SCALE, OutOfRange, ensure_fits, fits_column};
use rust_decimal::Decimal;
use thiserror::Error;

/// Employee and attendance rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeError {
    /// Base salary is negative.
    #[error("Base salary cannot be negative")]
    NegativeSalary,

    /// Overtime multiplier override is not in `(0, 1000)` with two decimals.
    #[error("Overtime multiplier must be greater than zero and less than 1000")]
    InvalidOvertimeMultiplier,

    /// Termination precedes hiring.
    #[error("Termination date {termination} is before hire date {hire}")]
    TerminationBeforeHire {
        /// Hire date.
        hire: NaiveDate,
        /// Termination date.
        termination: NaiveDate,
    },

    /// Overtime hours are negative or exceed a day.
    #[error("Overtime hours must be between 0 and 24, got {0}")]
    InvalidOvertimeHours(Decimal),

    /// An amount does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

fn is_valid_multiplier(multiplier: Decimal) -> bool {
    multiplier > Decimal::ZERO
        && multiplier < Decimal::ONE_THOUSAND
        && fits_column(multiplier, MONEY_SCALE)
}

/// Validates the contractual fields of an employee.
///
/// # Errors
///
/// Returns the first rule that fails.
pub fn validate_employee(
    base_salary: Decimal,
    overtime_multiplier: Option<Decimal>,
    hire_date: NaiveDate,
    termination_date: Option<NaiveDate>,
) -> Result<(), EmployeeError> {
    if base_salary < Decimal::ZERO {
        return Err(EmployeeError::NegativeSalary);
    }
    ensure_fits(base_salary, MONEY_SCALE, "base salary")?;
    if overtime_multiplier.is_some_and(|m| !is_valid_multiplier(m)) {
        return Err(EmployeeError::InvalidOvertimeMultiplier);
    }
    if let Some(termination) = termination_date.filter(|t| *t < hire_date) {
        return Err(EmployeeError::TerminationBeforeHire {
            hire: hire_date,
            termination,
        });
    }
    Ok(())
}

/// Validates the overtime recorded on an attendance row.
///
/// # Errors
///
/// Returns `InvalidOvertimeHours` outside `0..=24` or below a hundredth.
pub fn validate_attendance(overtime_hours: Decimal) -> Result<(), EmployeeError> {
    if overtime_hours < Decimal::ZERO
        || overtime_hours > Decimal::from(24)
        || !fits_column(overtime_hours, MONEY_SCALE)
    {
        return Err(EmployeeError::InvalidOvertimeHours(overtime_hours));
    }
    Ok(())
}
