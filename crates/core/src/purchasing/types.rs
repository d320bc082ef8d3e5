//! Purchasing domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Purchase order status.
///
/// The valid transitions are:
/// - Draft → Confirmed (confirm)
/// - Confirmed → Received (receive)
/// - Draft | Confirmed → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// Being prepared; lines can change.
    Draft,
    /// Sent to the supplier.
    Confirmed,
    /// Goods received and stock updated (final).
    Received,
    /// Abandoned (final).
    Cancelled,
}

impl PurchaseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "confirmed" => Some(Self::Confirmed),
            "received" => Some(Self::Received),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if lines and header can still be modified or deleted.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the order is still expected to deliver.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Confirmed)
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of a purchase order as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    /// Product ordered.
    pub product_id: Uuid,
    /// Quantity ordered.
    pub quantity: Decimal,
    /// Agreed unit cost.
    pub unit_cost: Decimal,
}

/// A stored purchase item that can be received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivableItem {
    /// Item ID.
    pub item_id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Quantity ordered.
    pub ordered: Decimal,
    /// Quantity expected to be received (set at confirmation).
    pub received: Decimal,
    /// Unit cost on the order.
    pub unit_cost: Decimal,
}

/// Client-supplied correction of a received quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptOverride {
    /// Item ID.
    pub item_id: Uuid,
    /// Quantity actually received.
    pub received_quantity: Decimal,
}

/// Quantity to book into stock for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item ID.
    pub item_id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Quantity received.
    pub quantity: Decimal,
    /// Unit cost on the order.
    pub unit_cost: Decimal,
}
