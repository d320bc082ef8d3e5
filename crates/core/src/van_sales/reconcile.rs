//! Loading checks and returns reconciliation.

use std::collections::{HashMap, HashSet};

use comptoir_shared::types::{
    MONEY_SCALE, OutOfRange, QUANTITY_SCALE, checked_money, ensure_fits, round_quantity,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::VanSaleStatus;
use crate::InvalidTransition;
use crate::inventory::InventoryError;

const DOCUMENT: &str = "van sale";

/// Van sale rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VanSaleError {
    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// Nothing loaded.
    #[error("Van sale must load at least one item")]
    NoItems,

    /// Loaded quantity is not positive.
    #[error("Loaded quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Unit price is negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// A return references an item that was not loaded.
    #[error("Item {0} was not loaded on this van")]
    UnknownItem(Uuid),

    /// The same item is returned twice.
    #[error("Item {0} appears more than once in the returns")]
    DuplicateReturn(Uuid),

    /// Returned quantity outside `0..=loaded`.
    #[error("Returned quantity {returned} for item {item_id} must be between 0 and {loaded}")]
    InvalidReturnQuantity {
        /// Item concerned.
        item_id: Uuid,
        /// Quantity loaded.
        loaded: Decimal,
        /// Quantity claimed as returned.
        returned: Decimal,
    },

    /// Cash collected is negative.
    #[error("Cash collected cannot be negative")]
    NegativeCash,

    /// Stock check failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// A quantity or amount does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// One product loaded onto the van.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedLine {
    /// Van sale item ID.
    pub item_id: Uuid,
    /// Product loaded.
    pub product_id: Uuid,
    /// Quantity loaded.
    pub loaded: Decimal,
    /// Selling price per unit.
    pub unit_price: Decimal,
}

/// Unsold quantity brought back for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnEntry {
    /// Van sale item ID.
    pub item_id: Uuid,
    /// Quantity returned.
    pub returned_quantity: Decimal,
}

/// Outcome for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciledLine {
    /// Van sale item ID.
    pub item_id: Uuid,
    /// Product.
    pub product_id: Uuid,
    /// Quantity loaded.
    pub loaded: Decimal,
    /// Quantity sold.
    pub sold: Decimal,
    /// Quantity returned to stock.
    pub returned: Decimal,
    /// `sold · unit_price`.
    pub line_total: Decimal,
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Per-item figures, in loading order.
    pub lines: Vec<ReconciledLine>,
    /// Value of the goods sold.
    pub total: Decimal,
    /// Cash handed in by the commercial.
    pub cash_collected: Decimal,
    /// `cash_collected − total`; negative means cash is missing.
    pub discrepancy: Decimal,
}

/// Validates the lines of a new load (quantities and prices only; stock is
/// checked against the database).
///
/// # Errors
///
/// Returns an error for an empty load, a non-positive quantity, a negative
/// price, or a figure that does not fit its column.
pub fn validate_load(lines: &[LoadedLine]) -> Result<(), VanSaleError> {
    if lines.is_empty() {
        return Err(VanSaleError::NoItems);
    }
    for line in lines {
        if line.loaded <= Decimal::ZERO {
            return Err(VanSaleError::NonPositiveQuantity);
        }
        if line.unit_price < Decimal::ZERO {
            return Err(VanSaleError::NegativePrice);
        }
        ensure_fits(line.loaded, QUANTITY_SCALE, "loaded quantity")?;
        ensure_fits(line.unit_price, MONEY_SCALE, "unit price")?;
    }
    Ok(())
}

/// Reconciles a loaded van against its returns and collected cash.
///
/// Items without a return entry are considered fully sold. Returned
/// quantities are rounded to stock precision (3 dp) before they are checked,
/// so `sold + returned = loaded` holds for every line.
///
/// # Errors
///
/// Returns an error when the van is not loaded, a return names an unknown
/// item or repeats one, a returned quantity lies outside `0..=loaded`, or the
/// cash is negative or oversize.
pub fn reconcile(
    status: VanSaleStatus,
    lines: &[LoadedLine],
    returns: &[ReturnEntry],
    cash_collected: Decimal,
) -> Result<Reconciliation, VanSaleError> {
    if status != VanSaleStatus::Loaded {
        return Err(InvalidTransition::new(DOCUMENT, status.as_str(), "reconciled").into());
    }
    if cash_collected < Decimal::ZERO {
        return Err(VanSaleError::NegativeCash);
    }
    ensure_fits(cash_collected, MONEY_SCALE, "cash collected")?;

    let by_id: HashMap<Uuid, &LoadedLine> = lines.iter().map(|l| (l.item_id, l)).collect();
    let mut seen = HashSet::new();
    let mut returned: HashMap<Uuid, Decimal> = HashMap::new();

    for entry in returns {
        let line = by_id
            .get(&entry.item_id)
            .ok_or(VanSaleError::UnknownItem(entry.item_id))?;
        if !seen.insert(entry.item_id) {
            return Err(VanSaleError::DuplicateReturn(entry.item_id));
        }
        let back = round_quantity(entry.returned_quantity);
        if back < Decimal::ZERO || back > line.loaded {
            return Err(VanSaleError::InvalidReturnQuantity {
                item_id: entry.item_id,
                loaded: line.loaded,
                returned: entry.returned_quantity,
            });
        }
        returned.insert(entry.item_id, back);
    }

    let mut total = Decimal::ZERO;
    let mut reconciled = Vec::with_capacity(lines.len());
    for line in lines {
        let back = returned.get(&line.item_id).copied().unwrap_or(Decimal::ZERO);
        let sold = line.loaded - back;
        let line_total = checked_money(sold.checked_mul(line.unit_price), "line total")?;
        total = checked_money(total.checked_add(line_total), "total")?;
        reconciled.push(ReconciledLine {
            item_id: line.item_id,
            product_id: line.product_id,
            loaded: line.loaded,
            sold,
            returned: back,
            line_total,
        });
    }

    Ok(Reconciliation {
        lines: reconciled,
        total,
        cash_collected,
        discrepancy: checked_money(cash_collected.checked_sub(total), "discrepancy")?,
    })
}

/// Loaded → Cancelled.
///
/// # Errors
///
/// Returns `InvalidTransition` once the van sale is reconciled or cancelled.
pub fn cancel(status: VanSaleStatus) -> Result<VanSaleStatus, VanSaleError> {
    match status {
        VanSaleStatus::Loaded => Ok(VanSaleStatus::Cancelled),
        _ => Err(InvalidTransition::new(DOCUMENT, status.as_str(), "cancelled").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loaded(qty: Decimal, price: Decimal) -> LoadedLine {
        LoadedLine {
            item_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            loaded: qty,
            unit_price: price,
        }
    }

    #[test]
    fn test_reconcile_with_partial_returns() {
        let lines = [loaded(dec!(20), dec!(2.5)), loaded(dec!(10), dec!(12))];
        let returns = [ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(4),
        }];

        let result = reconcile(VanSaleStatus::Loaded, &lines, &returns, dec!(150)).unwrap();

        assert_eq!(result.lines[0].sold, dec!(16));
        assert_eq!(result.lines[0].returned, dec!(4));
        assert_eq!(result.lines[0].line_total, dec!(40));
        // no return entry: fully sold
        assert_eq!(result.lines[1].sold, dec!(10));
        assert_eq!(result.lines[1].returned, dec!(0));
        assert_eq!(result.total, dec!(160));
        assert_eq!(result.discrepancy, dec!(-10));
    }

    #[test]
    fn test_everything_returned() {
        let lines = [loaded(dec!(5), dec!(3))];
        let returns = [ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(5),
        }];
        let result = reconcile(VanSaleStatus::Loaded, &lines, &returns, dec!(0)).unwrap();
        assert_eq!(result.total, dec!(0));
        assert_eq!(result.discrepancy, dec!(0));
    }

    #[test]
    fn test_reconcile_rejects_bad_returns() {
        let lines = [loaded(dec!(5), dec!(3))];
        let stranger = Uuid::new_v4();

        assert_eq!(
            reconcile(
                VanSaleStatus::Loaded,
                &lines,
                &[ReturnEntry {
                    item_id: stranger,
                    returned_quantity: dec!(1),
                }],
                dec!(0),
            ),
            Err(VanSaleError::UnknownItem(stranger))
        );

        let too_many = ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(6),
        };
        assert!(matches!(
            reconcile(VanSaleStatus::Loaded, &lines, &[too_many], dec!(0)),
            Err(VanSaleError::InvalidReturnQuantity { .. })
        ));

        let one = ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(1),
        };
        assert_eq!(
            reconcile(VanSaleStatus::Loaded, &lines, &[one, one], dec!(0)),
            Err(VanSaleError::DuplicateReturn(lines[0].item_id))
        );

        assert_eq!(
            reconcile(VanSaleStatus::Loaded, &lines, &[], dec!(-1)),
            Err(VanSaleError::NegativeCash)
        );
    }

    #[test]
    fn test_only_loaded_vans_reconcile_or_cancel() {
        let lines = [loaded(dec!(1), dec!(1))];
        assert!(matches!(
            reconcile(VanSaleStatus::Reconciled, &lines, &[], dec!(1)),
            Err(VanSaleError::Transition(_))
        ));
        assert_eq!(cancel(VanSaleStatus::Loaded).unwrap(), VanSaleStatus::Cancelled);
        assert!(cancel(VanSaleStatus::Reconciled).is_err());
        assert!(cancel(VanSaleStatus::Cancelled).is_err());
    }

    #[test]
    fn test_validate_load() {
        assert_eq!(validate_load(&[]), Err(VanSaleError::NoItems));
        assert_eq!(
            validate_load(&[loaded(dec!(0), dec!(1))]),
            Err(VanSaleError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_load(&[loaded(dec!(1), dec!(-1))]),
            Err(VanSaleError::NegativePrice)
        );
        assert!(validate_load(&[loaded(dec!(1), dec!(0))]).is_ok());
        assert!(matches!(
            validate_load(&[loaded(dec!(1000000000000000), dec!(1))]),
            Err(VanSaleError::OutOfRange(_))
        ));
        assert!(matches!(
            validate_load(&[loaded(dec!(0.0004), dec!(1))]),
            Err(VanSaleError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_fine_grained_returns_round_to_stock_precision() {
        let lines = [loaded(dec!(5), dec!(2))];
        let returns = [ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(1.0005),
        }];

        let result = reconcile(VanSaleStatus::Loaded, &lines, &returns, dec!(0)).unwrap();

        assert_eq!(result.lines[0].returned, dec!(1.001));
        assert_eq!(result.lines[0].sold, dec!(3.999));
        assert_eq!(result.lines[0].sold + result.lines[0].returned, dec!(5));
        assert_eq!(result.total, dec!(8));

        // Rounds onto the loaded quantity rather than past it.
        let just_over = ReturnEntry {
            item_id: lines[0].item_id,
            returned_quantity: dec!(5.0004),
        };
        let result = reconcile(VanSaleStatus::Loaded, &lines, &[just_over], dec!(0)).unwrap();
        assert_eq!(result.lines[0].sold, dec!(0));
    }

    #[test]
    fn test_reconcile_rejects_oversize_figures() {
        let lines = [
            loaded(dec!(999999999999999), dec!(9999999999999999)),
            loaded(dec!(1), dec!(1)),
        ];
        assert!(matches!(
            reconcile(VanSaleStatus::Loaded, &lines, &[], dec!(0)),
            Err(VanSaleError::OutOfRange(_))
        ));
        assert!(matches!(
            reconcile(VanSaleStatus::Loaded, &lines[1..], &[], dec!(10000000000000000)),
            Err(VanSaleError::OutOfRange(_))
        ));
    }
}
