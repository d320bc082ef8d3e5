//! Property-based tests for van reconciliation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{LoadedLine, ReturnEntry, VanSaleStatus, reconcile};

/// Loads at stock precision; returns counted at up to 6 dp, within the load.
fn load_and_return() -> impl Strategy<Value = (Decimal, Decimal)> {
    (1i64..100_000, 0u32..=6).prop_flat_map(|(loaded, scale)| {
        let limit = loaded * 10i64.pow(scale) / 1_000;
        (0i64..=limit)
            .prop_map(move |back| (Decimal::new(loaded, 3), Decimal::new(back, scale)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every loaded unit is accounted for as either sold or returned.
    #[test]
    fn prop_sold_plus_returned_equals_loaded(
        pairs in prop::collection::vec(load_and_return(), 1..8),
        price_cents in 0i64..100_000,
    ) {
        let price = Decimal::new(price_cents, 2);
        let lines: Vec<LoadedLine> = pairs
            .iter()
            .map(|(loaded, _)| LoadedLine {
                item_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                loaded: *loaded,
                unit_price: price,
            })
            .collect();
        let returns: Vec<ReturnEntry> = lines
            .iter()
            .zip(&pairs)
            .map(|(line, (_, back))| ReturnEntry {
                item_id: line.item_id,
                returned_quantity: *back,
            })
            .collect();

        let result = reconcile(VanSaleStatus::Loaded, &lines, &returns, Decimal::ZERO).unwrap();

        for line in &result.lines {
            prop_assert_eq!(line.sold + line.returned, line.loaded);
            prop_assert!(line.sold >= Decimal::ZERO);
            prop_assert!(line.returned.normalize().scale() <= 3);
        }
        prop_assert_eq!(result.discrepancy, -result.total);
    }
}
