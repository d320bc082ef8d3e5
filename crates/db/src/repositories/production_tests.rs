//! Tests for the production repository.

use super::*;
use comptoir_core::inventory::InventoryError;
use crate::entities::{bom_components, products, sea_orm_active_enums::ProductKind};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn order(status: ProductionStatus, bom_id: Uuid, product_id: Uuid) -> production_orders::Model {
    let now = chrono::Utc::now().into();
    production_orders::Model {
        id: Uuid::new_v4(),
        reference: "MO-20261016-0001".into(),
        bom_id,
        product_id,
        quantity: dec!(20),
        status,
        planned_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        unit_cost: None,
        notes: None,
        created_by: None,
        started_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn product(id: Uuid, quantity: Decimal, cost: Decimal) -> products::Model {
    let now = chrono::Utc::now().into();
    products::Model {
        id,
        sku: format!("SKU-{}", &id.to_string()[..8]),
        name: "Item".into(),
        description: None,
        kind: ProductKind::RawMaterial,
        unit: "kg".into(),
        quantity,
        unit_cost: cost,
        sale_price: dec!(0),
        reorder_level: dec!(0),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_complete_refused_when_components_short() {
    let bom_id = Uuid::new_v4();
    let output_id = Uuid::new_v4();
    let oil_id = Uuid::new_v4();
    let now = chrono::Utc::now().into();
    let bom = bills_of_materials::Model {
        id: bom_id,
        product_id: output_id,
        name: "Soap".into(),
        output_quantity: dec!(10),
        notes: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let component = bom_components::Model {
        id: Uuid::new_v4(),
        bom_id,
        component_id: oil_id,
        quantity: dec!(5),
    };
    // 20 units need 10 of oil; only 4 on hand.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order(ProductionStatus::InProgress, bom_id, output_id)]])
        .append_query_results([vec![bom]])
        .append_query_results([vec![component]])
        .append_query_results([vec![
            product(oil_id, dec!(4), dec!(3)),
            product(output_id, dec!(0), dec!(0)),
        ]])
        .into_connection();

    let err = ProductionOrderRepository::new(db)
        .complete(Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductionError::Rule(ManufacturingError::Inventory(
            InventoryError::ProductShortage { .. }
        ))
    ));
}

#[tokio::test]
async fn test_completed_order_cannot_be_deleted() {
    let row = order(ProductionStatus::Completed, Uuid::new_v4(), Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let err = ProductionOrderRepository::new(db)
        .delete(row.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ProductionError::NotDeletable));
}

#[tokio::test]
async fn test_start_twice_is_invalid() {
    let row = order(ProductionStatus::InProgress, Uuid::new_v4(), Uuid::new_v4());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let err = ProductionOrderRepository::new(db)
        .start(row.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductionError::Rule(ManufacturingError::Transition(_))
    ));
}
