//! Tests for the product repository.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn product(quantity: Decimal) -> products::Model {
    let now = chrono::Utc::now().into();
    products::Model {
        id: Uuid::new_v4(),
        sku: "FLOUR-25".into(),
        name: "Flour 25kg".into(),
        description: None,
        kind: ProductKind::RawMaterial,
        unit: "bag".into(),
        sale_price: dec!(30),
        unit_cost: dec!(21.5),
        quantity,
        reorder_level: dec!(5),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_create_rejects_duplicate_sku() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![product(dec!(0))]])
        .into_connection();
    let repo = ProductRepository::new(db);

    let err = repo
        .create(CreateProductInput {
            sku: " FLOUR-25 ".into(),
            name: "Flour".into(),
            description: None,
            kind: ProductKind::RawMaterial,
            unit: "bag".into(),
            sale_price: dec!(30),
            unit_cost: dec!(20),
            reorder_level: dec!(0),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProductError::DuplicateSku(sku) if sku == "FLOUR-25"));
}

#[tokio::test]
async fn test_adjust_refuses_negative_stock() {
    let existing = product(dec!(3));
    let id = existing.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .into_connection();
    let repo = ProductRepository::new(db);

    let err = repo
        .adjust_stock(
            id,
            AdjustStockInput {
                delta: dec!(-4),
                reason: "breakage".into(),
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProductError::Stock(InventoryError::InsufficientStock { .. })
    ));
}

#[tokio::test]
async fn test_delete_refused_when_on_purchase_order() {
    let existing = product(dec!(0));
    let id = existing.id;
    let item = purchase_items::Model {
        id: Uuid::new_v4(),
        purchase_id: Uuid::new_v4(),
        product_id: id,
        quantity: dec!(1),
        received_quantity: dec!(0),
        unit_cost: dec!(1),
        line_total: dec!(1),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .append_query_results([vec![item]])
        .into_connection();
    let repo = ProductRepository::new(db);

    let err = repo.delete(id).await.unwrap_err();
    assert!(matches!(err, ProductError::InUse("purchase orders")));
}
