//! Property-based tests for inventory costing and stock.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::costing::{StockPosition, weighted_average_cost};

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|n| Decimal::new(n, 3))
}

fn cost() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|n| Decimal::new(n, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The blended cost always lies between the old and the incoming cost.
    #[test]
    fn prop_wac_between_costs(
        on_hand in quantity(),
        current in cost(),
        incoming in quantity(),
        incoming_cost in cost(),
    ) {
        let wac = weighted_average_cost(on_hand, current, incoming, incoming_cost).unwrap();
        let low = current.min(incoming_cost);
        let high = current.max(incoming_cost);
        // Rounding to 4 dp may move the result by at most half a unit.
        let slack = Decimal::new(1, 4);
        prop_assert!(wac >= low - slack && wac <= high + slack);
    }

    /// Issuing never produces a negative balance.
    #[test]
    fn prop_issue_never_negative(on_hand in quantity(), requested in quantity()) {
        let position = StockPosition::new(on_hand, Decimal::ONE);
        match position.issue(requested) {
            Ok(after) => prop_assert!(after.on_hand >= Decimal::ZERO),
            Err(_) => prop_assert!(requested > on_hand),
        }
    }

    /// Receiving then issuing the same quantity restores the quantity.
    #[test]
    fn prop_receive_then_issue_restores_quantity(
        on_hand in quantity(),
        qty in quantity(),
        unit_cost in cost(),
    ) {
        let start = StockPosition::new(on_hand, Decimal::ONE);
        let after = start.receive(qty, unit_cost).unwrap().issue(qty).unwrap();
        prop_assert_eq!(after.on_hand, on_hand);
    }
}
