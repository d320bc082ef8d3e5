//! Inventory domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a product is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Consumed by production orders.
    RawMaterial,
    /// Produced from a bill of materials.
    FinishedGood,
    /// Bought and resold as-is.
    Merchandise,
}

impl ProductKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RawMaterial => "raw_material",
            Self::FinishedGood => "finished_good",
            Self::Merchandise => "merchandise",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "raw_material" => Some(Self::RawMaterial),
            "finished_good" => Some(Self::FinishedGood),
            "merchandise" => Some(Self::Merchandise),
            _ => None,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction in which a movement changes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    /// Increases stock on hand.
    Inbound,
    /// Decreases stock on hand.
    Outbound,
    /// Sign carried by the quantity itself.
    Either,
}

/// Reason for a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received against a purchase order.
    PurchaseReceipt,
    /// Goods sold on a confirmed sale.
    Sale,
    /// Goods returned to stock when a confirmed sale is cancelled.
    SaleCancellation,
    /// Goods loaded onto a van.
    VanLoad,
    /// Unsold goods returned from a van.
    VanReturn,
    /// Components consumed by production.
    ProductionConsumption,
    /// Finished goods produced.
    ProductionOutput,
    /// Manual correction after a stock count.
    Adjustment,
}

impl MovementType {
    /// Returns the direction of this movement type.
    #[must_use]
    pub const fn direction(&self) -> MovementDirection {
        match self {
            Self::PurchaseReceipt
            | Self::SaleCancellation
            | Self::VanReturn
            | Self::ProductionOutput => MovementDirection::Inbound,
            Self::Sale | Self::VanLoad | Self::ProductionConsumption => {
                MovementDirection::Outbound
            }
            Self::Adjustment => MovementDirection::Either,
        }
    }

    /// Returns the string representation of the movement type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PurchaseReceipt => "purchase_receipt",
            Self::Sale => "sale",
            Self::SaleCancellation => "sale_cancellation",
            Self::VanLoad => "van_load",
            Self::VanReturn => "van_return",
            Self::ProductionConsumption => "production_consumption",
            Self::ProductionOutput => "production_output",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_directions() {
        assert_eq!(
            MovementType::PurchaseReceipt.direction(),
            MovementDirection::Inbound
        );
        assert_eq!(MovementType::VanLoad.direction(), MovementDirection::Outbound);
        assert_eq!(MovementType::VanReturn.direction(), MovementDirection::Inbound);
        assert_eq!(MovementType::Adjustment.direction(), MovementDirection::Either);
    }

    #[test]
    fn test_product_kind_parse() {
        for kind in [
            ProductKind::RawMaterial,
            ProductKind::FinishedGood,
            ProductKind::Merchandise,
        ] {
            assert_eq!(ProductKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ProductKind::parse("service"), None);
    }
}
