//! Sales error types.

use comptoir_shared::types::OutOfRange;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::InvalidTransition;
use crate::inventory::InventoryError;

/// Sales rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleRuleError {
    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Sale has no lines.
    #[error("Sale must have at least one item")]
    NoItems,

    /// Sold quantity is not positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Unit price is negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// Line discount outside 0..=100 %.
    #[error("Discount must be between 0 and 100 percent, got {0}")]
    InvalidDiscountPercent(Decimal),

    /// Order discount outside 0..=subtotal.
    #[error("Order discount {discount} must be between 0 and the subtotal {subtotal}")]
    InvalidOrderDiscount {
        /// Discount requested.
        discount: Decimal,
        /// Subtotal of the lines.
        subtotal: Decimal,
    },

    /// Tax rate outside 0..=100 %.
    #[error("Tax rate must be between 0 and 100 percent, got {0}")]
    InvalidTaxRate(Decimal),

    /// Payment amount is not positive.
    #[error("Payment amount must be greater than zero")]
    NonPositivePayment,

    /// Payment would exceed the amount due.
    #[error("Payment of {amount} exceeds the outstanding balance {outstanding}")]
    Overpayment {
        /// Payment amount.
        amount: Decimal,
        /// Remaining balance.
        outstanding: Decimal,
    },

    /// Payments can only be recorded on confirmed sales.
    #[error("Payments can only be recorded on confirmed sales")]
    NotConfirmed,

    /// Sale with payments cannot be cancelled.
    #[error("Sale has payments and cannot be cancelled")]
    HasPayments,

    /// A figure does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    /// Stock check failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
