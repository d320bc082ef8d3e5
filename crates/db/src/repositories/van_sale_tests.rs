//! Tests for the van sale repository.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn van(status: VanSaleStatus) -> van_sales::Model {
    let now = chrono::Utc::now().into();
    van_sales::Model {
        id: Uuid::new_v4(),
        reference: "VAN-20261018-0001".into(),
        commercial_id: Uuid::new_v4(),
        status,
        load_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        total_amount: dec!(0),
        cash_collected: None,
        discrepancy: None,
        notes: None,
        created_by: None,
        reconciled_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_reconcile_rejects_return_above_loaded() {
    let loaded = van(VanSaleStatus::Loaded);
    let id = loaded.id;
    let item = van_sale_items::Model {
        id: Uuid::new_v4(),
        van_sale_id: id,
        product_id: Uuid::new_v4(),
        loaded_quantity: dec!(20),
        sold_quantity: dec!(0),
        returned_quantity: dec!(0),
        unit_price: dec!(4.5),
        line_total: dec!(0),
    };
    let item_id = item.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![loaded]])
        .append_query_results([vec![item]])
        .into_connection();

    let err = VanSaleRepository::new(db)
        .reconcile(
            id,
            ReconcileVanInput {
                returns: vec![ReturnEntry {
                    item_id,
                    returned_quantity: dec!(21),
                }],
                cash_collected: dec!(0),
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VanSaleRepoError::Rule(VanSaleError::InvalidReturnQuantity { .. })
    ));
}

#[tokio::test]
async fn test_cancel_after_reconcile_refused() {
    let reconciled = van(VanSaleStatus::Reconciled);
    let id = reconciled.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![reconciled]])
        .into_connection();

    let err = VanSaleRepository::new(db).cancel(id, None).await.unwrap_err();
    assert!(matches!(err, VanSaleRepoError::Rule(VanSaleError::Transition(_))));
}

#[tokio::test]
async fn test_load_refuses_inactive_commercial() {
    let now = chrono::Utc::now().into();
    let commercial = commercials::Model {
        id: Uuid::new_v4(),
        name: "Samir".into(),
        phone: None,
        email: None,
        vehicle_plate: None,
        commission_rate: dec!(0),
        is_active: false,
        created_at: now,
        updated_at: now,
    };
    let commercial_id = commercial.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![commercial]])
        .into_connection();

    let err = VanSaleRepository::new(db)
        .load(
            LoadVanInput {
                commercial_id,
                load_date: None,
                notes: None,
                items: vec![],
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VanSaleRepoError::CommercialInactive(id) if id == commercial_id));
}
