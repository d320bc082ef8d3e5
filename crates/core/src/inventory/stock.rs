//! Stock requirement aggregation and availability checks.

use std::collections::HashMap;

use comptoir_shared::types::round_quantity;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::InventoryError;

/// A quantity of a product needed by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRequirement {
    /// Product needed.
    pub product_id: Uuid,
    /// Quantity needed.
    pub quantity: Decimal,
}

impl StockRequirement {
    /// Creates a requirement.
    #[must_use]
    pub const fn new(product_id: Uuid, quantity: Decimal) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Sums requirements per product, keeping first-seen order.
///
/// A product that appears on several lines must be checked once against its
/// total, otherwise two lines of 6 could both pass against a stock of 10.
#[must_use]
pub fn aggregate_requirements(
    lines: impl IntoIterator<Item = StockRequirement>,
) -> Vec<StockRequirement> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();

    for line in lines {
        totals
            .entry(line.product_id)
            .and_modify(|q| *q += line.quantity)
            .or_insert_with(|| {
                order.push(line.product_id);
                line.quantity
            });
    }

    order
        .into_iter()
        .map(|id| StockRequirement::new(id, round_quantity(totals[&id])))
        .collect()
}

/// Checks aggregated requirements against stock on hand.
///
/// # Errors
///
/// Returns the first product that is unknown or short of stock.
pub fn check_availability<S: std::hash::BuildHasher>(
    requirements: &[StockRequirement],
    on_hand: &HashMap<Uuid, Decimal, S>,
) -> Result<(), InventoryError> {
    for requirement in requirements {
        let available = on_hand
            .get(&requirement.product_id)
            .copied()
            .ok_or(InventoryError::UnknownProduct(requirement.product_id))?;

        if requirement.quantity > available {
            return Err(InventoryError::ProductShortage {
                product_id: requirement.product_id,
                available,
                requested: requirement.quantity,
            });
        }
    }
    Ok(())
}

/// Returns true if stock is at or below the reorder level.
///
/// A reorder level of zero disables the alert.
#[must_use]
pub fn is_low_stock(on_hand: Decimal, reorder_level: Decimal) -> bool {
    reorder_level > Decimal::ZERO && on_hand <= reorder_level
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate_sums_same_product() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let aggregated = aggregate_requirements([
            StockRequirement::new(a, dec!(6)),
            StockRequirement::new(b, dec!(1)),
            StockRequirement::new(a, dec!(6)),
        ]);

        assert_eq!(
            aggregated,
            vec![
                StockRequirement::new(a, dec!(12)),
                StockRequirement::new(b, dec!(1)),
            ]
        );
    }

    #[test]
    fn test_split_lines_cannot_overdraw() {
        let a = Uuid::new_v4();
        let stock = HashMap::from([(a, dec!(10))]);
        let aggregated = aggregate_requirements([
            StockRequirement::new(a, dec!(6)),
            StockRequirement::new(a, dec!(6)),
        ]);

        assert_eq!(
            check_availability(&aggregated, &stock),
            Err(InventoryError::ProductShortage {
                product_id: a,
                available: dec!(10),
                requested: dec!(12),
            })
        );
    }

    #[test]
    fn test_unknown_product() {
        let a = Uuid::new_v4();
        let stock: HashMap<Uuid, Decimal> = HashMap::new();
        assert_eq!(
            check_availability(&[StockRequirement::new(a, dec!(1))], &stock),
            Err(InventoryError::UnknownProduct(a))
        );
    }

    #[test]
    fn test_low_stock() {
        assert!(is_low_stock(dec!(5), dec!(5)));
        assert!(is_low_stock(dec!(0), dec!(1)));
        assert!(!is_low_stock(dec!(6), dec!(5)));
        assert!(!is_low_stock(dec!(0), dec!(0)));
    }
}
