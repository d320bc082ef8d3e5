//! Van load and reconciliation against Postgres.

mod common;

use comptoir_core::van_sales::ReturnEntry;
use comptoir_db::entities::sea_orm_active_enums::{ProductKind, VanSaleStatus};
use comptoir_db::repositories::{AdjustStockInput, LoadVanInput, ReconcileVanInput, VanLoadLine};
use comptoir_db::{ProductRepository, VanSaleRepository};
use rust_decimal_macros::dec;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_reconcile_returns_unsold_stock() {
    let db = common::setup().await;
    let commercial_id = common::commercial(&db).await;
    let water = common::product(&db, ProductKind::Merchandise, dec!(2.50)).await;
    let juice = common::product(&db, ProductKind::Merchandise, dec!(4)).await;
    let products = ProductRepository::new(db.clone());
    for id in [water, juice] {
        products
            .adjust_stock(
                id,
                AdjustStockInput {
                    delta: dec!(100),
                    reason: "opening stock".into(),
                },
                None,
            )
            .await
            .unwrap();
    }

    let repo = VanSaleRepository::new(db.clone());
    let loaded = repo
        .load(
            LoadVanInput {
                commercial_id,
                load_date: None,
                notes: None,
                items: vec![
                    VanLoadLine {
                        product_id: water,
                        quantity: dec!(40),
                        unit_price: None,
                    },
                    VanLoadLine {
                        product_id: juice,
                        quantity: dec!(20),
                        unit_price: Some(dec!(3.80)),
                    },
                ],
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(loaded.van_sale.status, VanSaleStatus::Loaded);
    let on_hand = products.find_by_id(water).await.unwrap().unwrap().quantity;
    assert_eq!(on_hand, dec!(60));

    let water_item = loaded
        .items
        .iter()
        .find(|i| i.product_id == water)
        .unwrap();
    assert_eq!(water_item.unit_price, dec!(2.50));

    // 30 water sold, juice fully sold: 75.00 + 76.00
    let (reconciled, summary) = repo
        .reconcile(
            loaded.van_sale.id,
            ReconcileVanInput {
                returns: vec![ReturnEntry {
                    item_id: water_item.id,
                    returned_quantity: dec!(10),
                }],
                cash_collected: dec!(150),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(reconciled.van_sale.status, VanSaleStatus::Reconciled);
    assert_eq!(summary.total, dec!(151.00));
    assert_eq!(summary.discrepancy, dec!(-1.00));
    for item in &reconciled.items {
        assert_eq!(item.sold_quantity + item.returned_quantity, item.loaded_quantity);
    }
    let on_hand = products.find_by_id(water).await.unwrap().unwrap().quantity;
    assert_eq!(on_hand, dec!(70));

    assert!(repo.cancel(loaded.van_sale.id, None).await.is_err());
}
