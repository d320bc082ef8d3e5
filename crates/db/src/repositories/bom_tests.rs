//! Tests for the bom repository.

use super::*;
use crate::entities::sea_orm_active_enums::ProductionStatus;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn bom(id: Uuid) -> bills_of_materials::Model {
    let now = chrono::Utc::now().into();
    bills_of_materials::Model {
        id,
        product_id: Uuid::new_v4(),
        name: "Olive soap 100g".into(),
        output_quantity: dec!(10),
        notes: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_delete_refused_when_production_orders_exist() {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now().into();
    let order = production_orders::Model {
        id: Uuid::new_v4(),
        reference: "MO-20261001-0001".into(),
        bom_id: id,
        product_id: Uuid::new_v4(),
        quantity: dec!(20),
        status: ProductionStatus::Completed,
        planned_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        unit_cost: Some(dec!(1.25)),
        notes: None,
        created_by: None,
        started_at: None,
        completed_at: Some(now),
        created_at: now,
        updated_at: now,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![bom(id)]])
        .append_query_results([vec![order]])
        .into_connection();

    let err = BomRepository::new(db).delete(id).await.unwrap_err();
    assert!(matches!(err, BomError::InUse));
}

#[tokio::test]
async fn test_self_referencing_component_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let product_id = Uuid::new_v4();
    let err = BomRepository::new(db)
        .create(BomInput {
            product_id,
            name: "Loop".into(),
            output_quantity: dec!(1),
            notes: None,
            is_active: true,
            components: vec![BomComponent {
                component_id: product_id,
                quantity: dec!(1),
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BomError::Rule(ManufacturingError::SelfReference(id)) if id == product_id
    ));
}
