//! Sales orders: line pricing, order totals, payments and status rules.
//!
//! Confirming a sale issues stock; cancelling a confirmed sale restores it.
//! Stock itself is handled by the inventory module and the repository layer.

pub mod error;
pub mod pricing;
pub mod types;

pub use error::SaleRuleError;
pub use pricing::{SaleTotals, apply_payment, compute_totals, line_total, payment_status};
pub use types::{PaymentStatus, SaleLine, SaleStatus};

use rust_decimal::Decimal;

use crate::InvalidTransition;

const DOCUMENT: &str = "sale";

/// Draft → Confirmed.
///
/// # Errors
///
/// Returns `InvalidTransition` unless the sale is a draft.
pub fn confirm(current: SaleStatus) -> Result<SaleStatus, SaleRuleError> {
    match current {
        SaleStatus::Draft => Ok(SaleStatus::Confirmed),
        _ => Err(InvalidTransition::new(DOCUMENT, current.as_str(), "confirmed").into()),
    }
}

/// Draft | Confirmed → Cancelled. A sale that has received payments stays put.
///
/// # Errors
///
/// Returns `InvalidTransition` for a cancelled sale and `HasPayments` when
/// money was already collected.
pub fn cancel(current: SaleStatus, paid: Decimal) -> Result<SaleStatus, SaleRuleError> {
    if current == SaleStatus::Cancelled {
        return Err(InvalidTransition::new(DOCUMENT, current.as_str(), "cancelled").into());
    }
    if paid > Decimal::ZERO {
        return Err(SaleRuleError::HasPayments);
    }
    Ok(SaleStatus::Cancelled)
}

/// Checks that a sale can be edited or deleted.
///
/// # Errors
///
/// Returns `InvalidTransition` for non-draft sales.
pub fn ensure_editable(current: SaleStatus) -> Result<(), SaleRuleError> {
    if current.is_editable() {
        Ok(())
    } else {
        Err(InvalidTransition::new(DOCUMENT, current.as_str(), "draft").into())
    }
}

/// Payments are only taken on confirmed sales.
///
/// # Errors
///
/// Returns `NotConfirmed` for drafts and cancelled sales.
pub fn ensure_payable(current: SaleStatus) -> Result<(), SaleRuleError> {
    if current == SaleStatus::Confirmed {
        Ok(())
    } else {
        Err(SaleRuleError::NotConfirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_confirm_only_from_draft() {
        assert_eq!(confirm(SaleStatus::Draft).unwrap(), SaleStatus::Confirmed);
        assert!(confirm(SaleStatus::Confirmed).is_err());
        assert!(confirm(SaleStatus::Cancelled).is_err());
    }

    #[test]
    fn test_cancel() {
        assert_eq!(
            cancel(SaleStatus::Draft, dec!(0)).unwrap(),
            SaleStatus::Cancelled
        );
        assert_eq!(
            cancel(SaleStatus::Confirmed, dec!(0)).unwrap(),
            SaleStatus::Cancelled
        );
        assert_eq!(
            cancel(SaleStatus::Confirmed, dec!(10)),
            Err(SaleRuleError::HasPayments)
        );
        assert!(matches!(
            cancel(SaleStatus::Cancelled, dec!(0)),
            Err(SaleRuleError::Transition(_))
        ));
    }

    #[test]
    fn test_editable() {
        assert!(ensure_editable(SaleStatus::Draft).is_ok());
        assert!(ensure_editable(SaleStatus::Confirmed).is_err());
        assert!(ensure_payable(SaleStatus::Confirmed).is_ok());
        assert_eq!(
            ensure_payable(SaleStatus::Draft),
            Err(SaleRuleError::NotConfirmed)
        );
    }
}
