//! Purchase order service: status transitions, totals and receipt planning.

use std::collections::{HashMap, HashSet};

use comptoir_shared::types::{COST_SCALE, QUANTITY_SCALE, checked_money, ensure_fits};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::PurchaseRuleError;
use super::types::{PurchaseLine, PurchaseStatus, ReceiptLine, ReceiptOverride, ReceivableItem};
use crate::InvalidTransition;
use crate::inventory::StockPosition;

const DOCUMENT: &str = "purchase order";

/// Stateless purchasing rules.
pub struct PurchaseService;

impl PurchaseService {
    /// Draft → Confirmed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is a draft.
    pub fn confirm(current: PurchaseStatus) -> Result<PurchaseStatus, PurchaseRuleError> {
        match current {
            PurchaseStatus::Draft => Ok(PurchaseStatus::Confirmed),
            _ => Err(Self::transition(current, PurchaseStatus::Confirmed)),
        }
    }

    /// Confirmed → Received.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is confirmed.
    pub fn receive(current: PurchaseStatus) -> Result<PurchaseStatus, PurchaseRuleError> {
        match current {
            PurchaseStatus::Confirmed => Ok(PurchaseStatus::Received),
            _ => Err(Self::transition(current, PurchaseStatus::Received)),
        }
    }

    /// Draft | Confirmed → Cancelled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` once the order is received or cancelled.
    pub fn cancel(current: PurchaseStatus) -> Result<PurchaseStatus, PurchaseRuleError> {
        if current.is_open() {
            Ok(PurchaseStatus::Cancelled)
        } else {
            Err(Self::transition(current, PurchaseStatus::Cancelled))
        }
    }

    /// Checks that a draft may be edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` (to `draft`) for non-draft orders.
    pub fn ensure_editable(current: PurchaseStatus) -> Result<(), PurchaseRuleError> {
        if current.is_editable() {
            Ok(())
        } else {
            Err(Self::transition(current, PurchaseStatus::Draft))
        }
    }

    fn transition(from: PurchaseStatus, to: PurchaseStatus) -> PurchaseRuleError {
        InvalidTransition::new(DOCUMENT, from.as_str(), to.as_str()).into()
    }

    /// Validates the lines of a new or replaced order.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty order, a non-positive quantity, a
    /// negative unit cost or a figure that does not fit its column.
    pub fn validate_lines(lines: &[PurchaseLine]) -> Result<(), PurchaseRuleError> {
        if lines.is_empty() {
            return Err(PurchaseRuleError::NoItems);
        }
        for line in lines {
            if line.quantity <= Decimal::ZERO {
                return Err(PurchaseRuleError::NonPositiveQuantity);
            }
            if line.unit_cost < Decimal::ZERO {
                return Err(PurchaseRuleError::NegativeUnitCost);
            }
            ensure_fits(line.quantity, QUANTITY_SCALE, "quantity")?;
            ensure_fits(line.unit_cost, COST_SCALE, "unit cost")?;
        }
        Ok(())
    }

    /// Line total rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the total does not fit a money column.
    pub fn line_total(quantity: Decimal, unit_cost: Decimal) -> Result<Decimal, PurchaseRuleError> {
        Ok(checked_money(quantity.checked_mul(unit_cost), "line total")?)
    }

    /// Order total: sum of the rounded line totals.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if a line or the total does not fit.
    pub fn order_total(lines: &[PurchaseLine]) -> Result<Decimal, PurchaseRuleError> {
        lines.iter().try_fold(Decimal::ZERO, |total, l| {
            let line = Self::line_total(l.quantity, l.unit_cost)?;
            Ok(checked_money(total.checked_add(line), "order total")?)
        })
    }

    /// Decides what will be booked into stock when the order is received.
    ///
    /// Every item starts from the quantity recorded at confirmation (the
    /// ordered quantity); overrides replace it for the items they name.
    ///
    /// # Errors
    ///
    /// Returns an error if an override names an unknown item, names an item
    /// twice, or carries a quantity outside `0..=ordered`.
    pub fn plan_receipt(
        items: &[ReceivableItem],
        overrides: &[ReceiptOverride],
    ) -> Result<Vec<ReceiptLine>, PurchaseRuleError> {
        let by_id: HashMap<Uuid, &ReceivableItem> =
            items.iter().map(|item| (item.item_id, item)).collect();

        let mut seen = HashSet::new();
        let mut received: HashMap<Uuid, Decimal> = HashMap::new();
        for o in overrides {
            let item = by_id
                .get(&o.item_id)
                .ok_or(PurchaseRuleError::UnknownItem(o.item_id))?;
            if !seen.insert(o.item_id) {
                return Err(PurchaseRuleError::DuplicateItem(o.item_id));
            }
            ensure_fits(o.received_quantity, QUANTITY_SCALE, "received quantity")?;
            if o.received_quantity < Decimal::ZERO || o.received_quantity > item.ordered {
                return Err(PurchaseRuleError::InvalidReceivedQuantity {
                    item_id: o.item_id,
                    ordered: item.ordered,
                    received: o.received_quantity,
                });
            }
            received.insert(o.item_id, o.received_quantity);
        }

        Ok(items
            .iter()
            .map(|item| ReceiptLine {
                item_id: item.item_id,
                product_id: item.product_id,
                quantity: received.get(&item.item_id).copied().unwrap_or(item.received),
                unit_cost: item.unit_cost,
            })
            .collect())
    }

    /// Applies a receipt line to a product's stock position.
    ///
    /// Zero-quantity lines leave the position untouched.
    ///
    /// # Errors
    ///
    /// Propagates stock errors (negative cost).
    pub fn apply_receipt(
        position: StockPosition,
        line: &ReceiptLine,
    ) -> Result<StockPosition, PurchaseRuleError> {
        if line.quantity.is_zero() {
            return Ok(position);
        }
        Ok(position.receive(line.quantity, line.unit_cost)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(ordered: Decimal, cost: Decimal) -> ReceivableItem {
        ReceivableItem {
            item_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            ordered,
            received: ordered,
            unit_cost: cost,
        }
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            PurchaseService::confirm(PurchaseStatus::Draft).unwrap(),
            PurchaseStatus::Confirmed
        );
        assert_eq!(
            PurchaseService::receive(PurchaseStatus::Confirmed).unwrap(),
            PurchaseStatus::Received
        );
        assert_eq!(
            PurchaseService::cancel(PurchaseStatus::Confirmed).unwrap(),
            PurchaseStatus::Cancelled
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(PurchaseService::confirm(PurchaseStatus::Confirmed).is_err());
        assert!(PurchaseService::receive(PurchaseStatus::Draft).is_err());
        assert!(PurchaseService::receive(PurchaseStatus::Received).is_err());
        assert!(PurchaseService::cancel(PurchaseStatus::Received).is_err());
        assert!(PurchaseService::cancel(PurchaseStatus::Cancelled).is_err());

        let err = PurchaseService::receive(PurchaseStatus::Draft).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot move purchase order from 'draft' to 'received'"
        );
    }

    #[test]
    fn test_only_drafts_are_editable() {
        assert!(PurchaseService::ensure_editable(PurchaseStatus::Draft).is_ok());
        assert!(PurchaseService::ensure_editable(PurchaseStatus::Confirmed).is_err());
    }

    #[test]
    fn test_validate_lines() {
        let product_id = Uuid::new_v4();
        assert_eq!(
            PurchaseService::validate_lines(&[]),
            Err(PurchaseRuleError::NoItems)
        );
        assert_eq!(
            PurchaseService::validate_lines(&[PurchaseLine {
                product_id,
                quantity: dec!(0),
                unit_cost: dec!(1),
            }]),
            Err(PurchaseRuleError::NonPositiveQuantity)
        );
        assert_eq!(
            PurchaseService::validate_lines(&[PurchaseLine {
                product_id,
                quantity: dec!(1),
                unit_cost: dec!(-1),
            }]),
            Err(PurchaseRuleError::NegativeUnitCost)
        );
    }

    #[test]
    fn test_order_total() {
        let product_id = Uuid::new_v4();
        let lines = [
            PurchaseLine {
                product_id,
                quantity: dec!(3),
                unit_cost: dec!(3.333),
            },
            PurchaseLine {
                product_id,
                quantity: dec!(2),
                unit_cost: dec!(10),
            },
        ];
        // 9.999 -> 10.00, + 20.00
        assert_eq!(PurchaseService::order_total(&lines).unwrap(), dec!(30.00));
    }

    #[test]
    fn test_oversize_figures_are_rejected() {
        assert!(matches!(
            PurchaseService::line_total(dec!(10000000000000000000000000000), dec!(100)),
            Err(PurchaseRuleError::OutOfRange(_))
        ));

        let product_id = Uuid::new_v4();
        let line = PurchaseLine {
            product_id,
            quantity: dec!(999999999999999),
            unit_cost: dec!(99999999999999),
        };
        assert!(PurchaseService::validate_lines(&[line]).is_ok());
        assert!(matches!(
            PurchaseService::order_total(&[line]),
            Err(PurchaseRuleError::OutOfRange(_))
        ));

        let too_precise = PurchaseLine {
            product_id,
            quantity: dec!(1.0001),
            unit_cost: dec!(1),
        };
        assert!(matches!(
            PurchaseService::validate_lines(&[too_precise]),
            Err(PurchaseRuleError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_plan_receipt_defaults_to_confirmed_quantities() {
        let items = [item(dec!(10), dec!(2)), item(dec!(5), dec!(4))];
        let plan = PurchaseService::plan_receipt(&items, &[]).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].quantity, dec!(10));
        assert_eq!(plan[1].quantity, dec!(5));
    }

    #[test]
    fn test_plan_receipt_applies_overrides() {
        let items = [item(dec!(10), dec!(2)), item(dec!(5), dec!(4))];
        let overrides = [ReceiptOverride {
            item_id: items[1].item_id,
            received_quantity: dec!(3),
        }];
        let plan = PurchaseService::plan_receipt(&items, &overrides).unwrap();

        assert_eq!(plan[0].quantity, dec!(10));
        assert_eq!(plan[1].quantity, dec!(3));
    }

    #[test]
    fn test_plan_receipt_rejects_bad_overrides() {
        let items = [item(dec!(10), dec!(2))];
        let unknown = Uuid::new_v4();

        assert_eq!(
            PurchaseService::plan_receipt(
                &items,
                &[ReceiptOverride {
                    item_id: unknown,
                    received_quantity: dec!(1)
                }]
            ),
            Err(PurchaseRuleError::UnknownItem(unknown))
        );

        let over = ReceiptOverride {
            item_id: items[0].item_id,
            received_quantity: dec!(11),
        };
        assert!(matches!(
            PurchaseService::plan_receipt(&items, &[over]),
            Err(PurchaseRuleError::InvalidReceivedQuantity { .. })
        ));

        let once = ReceiptOverride {
            item_id: items[0].item_id,
            received_quantity: dec!(1),
        };
        assert_eq!(
            PurchaseService::plan_receipt(&items, &[once, once]),
            Err(PurchaseRuleError::DuplicateItem(items[0].item_id))
        );
    }

    #[test]
    fn test_apply_receipt_uses_weighted_average() {
        let position = StockPosition::new(dec!(10), dec!(5));
        let line = ReceiptLine {
            item_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: dec!(30),
            unit_cost: dec!(7),
        };
        let after = PurchaseService::apply_receipt(position, &line).unwrap();
        assert_eq!(after, StockPosition::new(dec!(40), dec!(6.5)));

        let nothing = ReceiptLine {
            quantity: dec!(0),
            ..line
        };
        assert_eq!(
            PurchaseService::apply_receipt(position, &nothing).unwrap(),
            position
        );
    }
}
