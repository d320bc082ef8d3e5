//! Business partners: suppliers, clients and field commercials.

use rust_decimal::Decimal;
use thiserror::Error;

/// Partner validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartnerError {
    /// Name is blank.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Commission rate outside 0..=100.
    #[error("Commission rate must be between 0 and 100, got {0}")]
    InvalidCommissionRate(Decimal),

    /// Negative credit limit.
    #[error("Credit limit cannot be negative")]
    NegativeCreditLimit,
}

/// Trims a partner name and rejects blank names.
///
/// # Errors
///
/// Returns `PartnerError::EmptyName` for a blank name.
pub fn normalize_name(name: &str) -> Result<String, PartnerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PartnerError::EmptyName);
    }
    Ok(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Validates a commercial's commission rate (percent).
///
/// # Errors
///
/// Returns `PartnerError::InvalidCommissionRate` outside `0..=100`.
pub fn validate_commission_rate(rate: Decimal) -> Result<(), PartnerError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(PartnerError::InvalidCommissionRate(rate));
    }
    Ok(())
}

/// Validates a client's credit limit.
///
/// # Errors
///
/// Returns `PartnerError::NegativeCreditLimit` for a negative limit.
pub fn validate_credit_limit(limit: Decimal) -> Result<(), PartnerError> {
    if limit < Decimal::ZERO {
        return Err(PartnerError::NegativeCreditLimit);
    }
    Ok(())
}

/// Commission earned by a commercial on a sold amount (2 dp).
#[must_use]
pub fn commission(amount: Decimal, rate: Decimal) -> Decimal {
    comptoir_shared::types::round_money(amount * rate / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Atlas   Trading  ").unwrap(), "Atlas Trading");
        assert_eq!(normalize_name("   "), Err(PartnerError::EmptyName));
    }

    #[test]
    fn test_commission_rate_bounds() {
        assert!(validate_commission_rate(dec!(0)).is_ok());
        assert!(validate_commission_rate(dec!(100)).is_ok());
        assert!(validate_commission_rate(dec!(100.01)).is_err());
        assert!(validate_commission_rate(dec!(-1)).is_err());
    }

    #[test]
    fn test_credit_limit() {
        assert!(validate_credit_limit(dec!(0)).is_ok());
        assert_eq!(
            validate_credit_limit(dec!(-5)),
            Err(PartnerError::NegativeCreditLimit)
        );
    }

    #[test]
    fn test_commission() {
        assert_eq!(commission(dec!(1234.50), dec!(2.5)), dec!(30.86));
    }
}
