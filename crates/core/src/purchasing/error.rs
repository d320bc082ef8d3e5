//! Purchasing error types.

use comptoir_shared::types::OutOfRange;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::InvalidTransition;
use crate::inventory::InventoryError;

/// Purchasing rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseRuleError {
    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Order has no lines.
    #[error("Purchase order must have at least one item")]
    NoItems,

    /// Ordered quantity is not positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Unit cost is negative.
    #[error("Unit cost cannot be negative")]
    NegativeUnitCost,

    /// A figure does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    /// A receipt override references an item that is not on the order.
    #[error("Item {0} does not belong to this purchase order")]
    UnknownItem(Uuid),

    /// The same item appears twice in a receipt.
    #[error("Item {0} appears more than once in the receipt")]
    DuplicateItem(Uuid),

    /// Received quantity outside `0..=ordered`.
    #[error("Received quantity {received} for item {item_id} must be between 0 and {ordered}")]
    InvalidReceivedQuantity {
        /// Item concerned.
        item_id: Uuid,
        /// Ordered quantity.
        ordered: Decimal,
        /// Quantity claimed as received.
        received: Decimal,
    },

    /// Stock update failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
