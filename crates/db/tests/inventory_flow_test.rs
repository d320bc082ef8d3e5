//! Purchase receipts, sales and stock adjustments against Postgres.

mod common;

use comptoir_core::inventory::InventoryError;
use comptoir_core::purchasing::{PurchaseLine, ReceiptOverride};
use comptoir_core::sales::{SaleLine, SaleRuleError};
use comptoir_db::entities::sea_orm_active_enums::{MovementType, ProductKind, PurchaseStatus};
use comptoir_db::repositories::{
    AdjustStockInput, ProductError, PurchaseInput, SaleError, SaleInput,
};
use comptoir_db::{ProductRepository, PurchaseRepository, SaleRepository};
use comptoir_shared::types::PageRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

async fn receive(db: &DatabaseConnection, supplier_id: Uuid, line: PurchaseLine) {
    let repo = PurchaseRepository::new(db.clone());
    let po = repo
        .create(
            PurchaseInput {
                supplier_id,
                order_date: None,
                expected_date: None,
                notes: None,
                items: vec![line],
            },
            None,
        )
        .await
        .expect("Failed to create purchase");
    repo.confirm(po.purchase.id).await.expect("Failed to confirm");
    repo.receive(po.purchase.id, &[], None)
        .await
        .expect("Failed to receive");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_receipts_update_weighted_average_cost() {
    let db = common::setup().await;
    let supplier_id = common::supplier(&db).await;
    let product_id = common::product(&db, ProductKind::Merchandise, dec!(12)).await;

    receive(&db, supplier_id, PurchaseLine {
        product_id,
        quantity: dec!(10),
        unit_cost: dec!(4),
    })
    .await;
    receive(&db, supplier_id, PurchaseLine {
        product_id,
        quantity: dec!(30),
        unit_cost: dec!(8),
    })
    .await;

    let product = ProductRepository::new(db.clone())
        .find_by_id(product_id)
        .await
        .unwrap()
        .expect("Product should exist");
    assert_eq!(product.quantity, dec!(40));
    assert_eq!(product.unit_cost, dec!(7));

    let movements = ProductRepository::new(db.clone())
        .movements(product_id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(movements.meta.total, 2);
    assert!(
        movements
            .data
            .iter()
            .all(|m| m.movement_type == MovementType::PurchaseReceipt)
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_partial_receipt_books_override_quantity() {
    let db = common::setup().await;
    let supplier_id = common::supplier(&db).await;
    let product_id = common::product(&db, ProductKind::RawMaterial, Decimal::ZERO).await;
    let repo = PurchaseRepository::new(db.clone());

    let po = repo
        .create(
            PurchaseInput {
                supplier_id,
                order_date: None,
                expected_date: None,
                notes: Some("partial".into()),
                items: vec![PurchaseLine {
                    product_id,
                    quantity: dec!(50),
                    unit_cost: dec!(2),
                }],
            },
            None,
        )
        .await
        .unwrap();
    assert!(po.purchase.reference.starts_with("PO-"));

    let confirmed = repo.confirm(po.purchase.id).await.unwrap();
    assert_eq!(confirmed.items[0].received_quantity, dec!(50));

    let received = repo
        .receive(
            po.purchase.id,
            &[ReceiptOverride {
                item_id: confirmed.items[0].id,
                received_quantity: dec!(20),
            }],
            None,
        )
        .await
        .unwrap();
    assert_eq!(received.purchase.status, PurchaseStatus::Received);
    assert_eq!(received.items[0].received_quantity, dec!(20));

    let product = ProductRepository::new(db.clone())
        .find_by_id(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.quantity, dec!(20));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_sale_checks_stock_across_lines() {
    let db = common::setup().await;
    let supplier_id = common::supplier(&db).await;
    let product_id = common::product(&db, ProductKind::Merchandise, dec!(15)).await;
    receive(&db, supplier_id, PurchaseLine {
        product_id,
        quantity: dec!(10),
        unit_cost: dec!(5),
    })
    .await;

    let line = SaleLine {
        product_id,
        quantity: dec!(6),
        unit_price: dec!(15),
        discount_percent: Decimal::ZERO,
    };
    let repo = SaleRepository::new(db.clone());
    let sale = repo
        .create(
            SaleInput {
                client_id: None,
                commercial_id: None,
                sale_date: None,
                discount_amount: Decimal::ZERO,
                tax_rate: Decimal::ZERO,
                notes: None,
                items: vec![line, line],
            },
            None,
        )
        .await
        .unwrap();

    let err = repo.confirm(sale.sale.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        SaleError::Rule(SaleRuleError::Inventory(InventoryError::ProductShortage { .. }))
    ));

    let product = ProductRepository::new(db.clone())
        .find_by_id(product_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.quantity, dec!(10));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_adjustment_cannot_go_negative_and_blocks_delete() {
    let db = common::setup().await;
    let product_id = common::product(&db, ProductKind::Merchandise, dec!(3)).await;
    let repo = ProductRepository::new(db.clone());

    let (product, movement) = repo
        .adjust_stock(
            product_id,
            AdjustStockInput {
                delta: dec!(5),
                reason: "stocktake".into(),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(product.quantity, dec!(5));
    assert_eq!(movement.balance_after, dec!(5));

    let err = repo
        .adjust_stock(
            product_id,
            AdjustStockInput {
                delta: dec!(-6),
                reason: "breakage".into(),
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProductError::Stock(_)));

    let err = repo.delete(product_id).await.unwrap_err();
    assert!(matches!(err, ProductError::InUse("stock movements")));
}
