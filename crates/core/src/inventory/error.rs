//! Inventory error types.

use comptoir_shared::types::OutOfRange;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Inventory rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Not enough stock to issue the requested quantity.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Quantity on hand.
        available: Decimal,
        /// Quantity asked for.
        requested: Decimal,
    },

    /// Not enough stock of a specific product.
    #[error("Insufficient stock for product {product_id}: {available} available, {requested} requested")]
    ProductShortage {
        /// Product short of stock.
        product_id: Uuid,
        /// Quantity on hand.
        available: Decimal,
        /// Quantity asked for.
        requested: Decimal,
    },

    /// Product referenced by a requirement is unknown.
    #[error("Product not found: {0}")]
    UnknownProduct(Uuid),

    /// Quantity must be strictly positive.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Cost or price cannot be negative.
    #[error("Cost cannot be negative")]
    NegativeCost,

    /// A stock adjustment of zero does nothing.
    #[error("Adjustment quantity cannot be zero")]
    ZeroAdjustment,

    /// A figure does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}
