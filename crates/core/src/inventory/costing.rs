//! Weighted-average costing.

use comptoir_shared::types::{
    COST_SCALE, QUANTITY_SCALE, checked_cost, checked_quantity, ensure_fits,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InventoryError;

/// Computes the new unit cost after receiving goods.
///
/// - Non-positive incoming quantity leaves the cost unchanged.
/// - When nothing (or a negative balance) is on hand, the incoming cost wins.
/// - Otherwise the cost is the quantity-weighted mean, rounded to 4 dp.
///
/// # Errors
///
/// Returns `OutOfRange` when the blended cost does not fit a cost column.
pub fn weighted_average_cost(
    on_hand: Decimal,
    current_cost: Decimal,
    incoming_qty: Decimal,
    incoming_cost: Decimal,
) -> Result<Decimal, InventoryError> {
    if incoming_qty <= Decimal::ZERO {
        return Ok(current_cost);
    }
    if on_hand <= Decimal::ZERO {
        return Ok(checked_cost(Some(incoming_cost), "unit cost")?);
    }

    let total_value = on_hand
        .checked_mul(current_cost)
        .zip(incoming_qty.checked_mul(incoming_cost))
        .and_then(|(held, incoming)| held.checked_add(incoming));
    let total_qty = on_hand.checked_add(incoming_qty);
    let blended = total_value
        .zip(total_qty)
        .and_then(|(value, qty)| value.checked_div(qty));
    Ok(checked_cost(blended, "unit cost")?)
}

/// Stock on hand and current unit cost of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPosition {
    /// Quantity on hand.
    pub on_hand: Decimal,
    /// Weighted-average unit cost.
    pub unit_cost: Decimal,
}

impl StockPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(on_hand: Decimal, unit_cost: Decimal) -> Self {
        Self { on_hand, unit_cost }
    }

    /// Receives goods at a cost, updating the weighted-average cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is not positive, the cost is negative,
    /// or the new balance no longer fits its column.
    pub fn receive(self, quantity: Decimal, cost: Decimal) -> Result<Self, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::NonPositiveQuantity);
        }
        if cost < Decimal::ZERO {
            return Err(InventoryError::NegativeCost);
        }
        ensure_fits(quantity, QUANTITY_SCALE, "quantity")?;
        ensure_fits(cost, COST_SCALE, "unit cost")?;

        Ok(Self {
            unit_cost: weighted_average_cost(self.on_hand, self.unit_cost, quantity, cost)?,
            on_hand: checked_quantity(self.on_hand.checked_add(quantity), "stock on hand")?,
        })
    }

    /// Returns goods to stock at the current cost (cancellations, van returns).
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is not positive or the new balance
    /// no longer fits its column.
    pub fn restock(self, quantity: Decimal) -> Result<Self, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::NonPositiveQuantity);
        }
        Ok(Self {
            on_hand: checked_quantity(self.on_hand.checked_add(quantity), "stock on hand")?,
            unit_cost: self.unit_cost,
        })
    }

    /// Issues goods from stock. Cost is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` instead of letting stock go negative.
    pub fn issue(self, quantity: Decimal) -> Result<Self, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::NonPositiveQuantity);
        }
        if quantity > self.on_hand {
            return Err(InventoryError::InsufficientStock {
                available: self.on_hand,
                requested: quantity,
            });
        }
        Ok(Self {
            on_hand: checked_quantity(self.on_hand.checked_sub(quantity), "stock on hand")?,
            unit_cost: self.unit_cost,
        })
    }

    /// Applies a signed manual adjustment.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero delta or when the result would be negative.
    pub fn adjust(self, delta: Decimal) -> Result<Self, InventoryError> {
        if delta.is_zero() {
            return Err(InventoryError::ZeroAdjustment);
        }
        if delta.is_sign_negative() {
            self.issue(-delta)
        } else {
            self.restock(delta)
        }
    }

    /// Value of the stock at the current cost. Saturates instead of
    /// overflowing; the figure is only reported.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.on_hand.saturating_mul(self.unit_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wac_blends_costs() {
        // 10 @ 5.00 + 30 @ 7.00 = 260 / 40 = 6.50
        assert_eq!(
            weighted_average_cost(dec!(10), dec!(5), dec!(30), dec!(7)).unwrap(),
            dec!(6.5)
        );
    }

    #[test]
    fn test_wac_empty_stock_takes_incoming_cost() {
        assert_eq!(
            weighted_average_cost(dec!(0), dec!(99), dec!(5), dec!(3.25)).unwrap(),
            dec!(3.25)
        );
        assert_eq!(
            weighted_average_cost(dec!(-2), dec!(99), dec!(5), dec!(3.25)).unwrap(),
            dec!(3.25)
        );
    }

    #[test]
    fn test_wac_zero_incoming_keeps_cost() {
        assert_eq!(
            weighted_average_cost(dec!(10), dec!(4), dec!(0), dec!(100)).unwrap(),
            dec!(4)
        );
    }

    #[test]
    fn test_wac_rounds_to_four_places() {
        // 1 @ 1 + 2 @ 2 = 5 / 3 = 1.6667
        assert_eq!(
            weighted_average_cost(dec!(1), dec!(1), dec!(2), dec!(2)).unwrap(),
            dec!(1.6667)
        );
    }

    #[test]
    fn test_receive_updates_quantity_and_cost() {
        let position = StockPosition::new(dec!(10), dec!(5))
            .receive(dec!(30), dec!(7))
            .unwrap();
        assert_eq!(position.on_hand, dec!(40));
        assert_eq!(position.unit_cost, dec!(6.5));
    }

    #[test]
    fn test_issue_refuses_overdraw() {
        let position = StockPosition::new(dec!(3), dec!(2));
        assert_eq!(
            position.issue(dec!(4)),
            Err(InventoryError::InsufficientStock {
                available: dec!(3),
                requested: dec!(4),
            })
        );
        assert_eq!(position.issue(dec!(3)).unwrap().on_hand, dec!(0));
    }

    #[test]
    fn test_adjust_both_directions() {
        let position = StockPosition::new(dec!(5), dec!(1));
        assert_eq!(position.adjust(dec!(2.5)).unwrap().on_hand, dec!(7.5));
        assert_eq!(position.adjust(dec!(-5)).unwrap().on_hand, dec!(0));
        assert!(position.adjust(dec!(-6)).is_err());
        assert_eq!(position.adjust(dec!(0)), Err(InventoryError::ZeroAdjustment));
    }

    #[test]
    fn test_receive_rejects_bad_input() {
        let position = StockPosition::new(dec!(5), dec!(1));
        assert_eq!(
            position.receive(dec!(0), dec!(1)),
            Err(InventoryError::NonPositiveQuantity)
        );
        assert_eq!(
            position.receive(dec!(1), dec!(-1)),
            Err(InventoryError::NegativeCost)
        );
    }

    #[test]
    fn test_oversize_stock_is_rejected() {
        let position = StockPosition::new(dec!(999999999999999), dec!(1));
        assert!(matches!(
            position.restock(dec!(1)),
            Err(InventoryError::OutOfRange(_))
        ));
        assert!(matches!(
            position.receive(dec!(1), dec!(1)),
            Err(InventoryError::OutOfRange(_))
        ));
        assert!(matches!(
            StockPosition::new(dec!(1), dec!(1)).receive(dec!(1.0004), dec!(1)),
            Err(InventoryError::OutOfRange(_))
        ));
        assert!(matches!(
            weighted_average_cost(dec!(1), dec!(1), dec!(1), dec!(99999999999999)),
            Ok(_)
        ));
    }
}
