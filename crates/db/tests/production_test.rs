//! BOM costing and production completion against Postgres.

mod common;

use comptoir_core::manufacturing::BomComponent;
use comptoir_db::entities::sea_orm_active_enums::{ProductKind, ProductionStatus};
use comptoir_db::repositories::{AdjustStockInput, BomError, BomInput, CreateProductionInput};
use comptoir_db::{BomRepository, ProductRepository, ProductionOrderRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_completion_consumes_components_and_values_output() {
    let db = common::setup().await;
    let oil = common::product(&db, ProductKind::RawMaterial, Decimal::ZERO).await;
    let lye = common::product(&db, ProductKind::RawMaterial, Decimal::ZERO).await;
    let soap = common::product(&db, ProductKind::FinishedGood, dec!(9)).await;

    let products = ProductRepository::new(db.clone());
    for id in [oil, lye] {
        products
            .adjust_stock(
                id,
                AdjustStockInput {
                    delta: dec!(50),
                    reason: "opening stock".into(),
                },
                None,
            )
            .await
            .unwrap();
    }

    let boms = BomRepository::new(db.clone());
    let bom = boms
        .create(BomInput {
            product_id: soap,
            name: "Soap batch".into(),
            output_quantity: dec!(10),
            notes: None,
            is_active: true,
            components: vec![
                BomComponent {
                    component_id: oil,
                    quantity: dec!(4),
                },
                BomComponent {
                    component_id: lye,
                    quantity: dec!(1),
                },
            ],
        })
        .await
        .unwrap();

    let orders = ProductionOrderRepository::new(db.clone());
    let order = orders
        .create(
            CreateProductionInput {
                bom_id: bom.bom.id,
                quantity: dec!(20),
                planned_date: None,
                notes: None,
            },
            None,
        )
        .await
        .unwrap();
    assert!(order.reference.starts_with("MO-"));
    orders.start(order.id).await.unwrap();

    let done = orders.complete(order.id, None).await.unwrap();
    assert_eq!(done.status, ProductionStatus::Completed);
    assert!(done.completed_at.is_some());

    assert_eq!(products.find_by_id(oil).await.unwrap().unwrap().quantity, dec!(42));
    assert_eq!(products.find_by_id(lye).await.unwrap().unwrap().quantity, dec!(48));
    assert_eq!(products.find_by_id(soap).await.unwrap().unwrap().quantity, dec!(20));

    let err = boms.delete(bom.bom.id).await.unwrap_err();
    assert!(matches!(err, BomError::InUse));
    assert!(orders.delete(order.id).await.is_err());
}
