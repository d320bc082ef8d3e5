//! Tests for the sale repository.

use super::*;
use comptoir_core::inventory::InventoryError;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::entities::{products, sea_orm_active_enums::ProductKind};

fn sale(status: SaleStatus, paid: Decimal) -> sales::Model {
    let now = chrono::Utc::now().into();
    sales::Model {
        id: Uuid::new_v4(),
        reference: "SO-20261018-0001".into(),
        client_id: None,
        commercial_id: None,
        status,
        payment_status: PaymentStatus::Unpaid,
        sale_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        subtotal: dec!(120),
        discount_amount: dec!(0),
        tax_rate: dec!(0),
        tax_amount: dec!(0),
        total_amount: dec!(120),
        paid_amount: paid,
        notes: None,
        created_by: None,
        confirmed_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn item(sale_id: Uuid, product_id: Uuid, quantity: Decimal) -> sale_items::Model {
    sale_items::Model {
        id: Uuid::new_v4(),
        sale_id,
        product_id,
        quantity,
        unit_price: dec!(10),
        discount_percent: dec!(0),
        unit_cost: None,
        line_total: quantity * dec!(10),
    }
}

#[tokio::test]
async fn test_confirm_checks_aggregated_quantity() {
    let draft = sale(SaleStatus::Draft, dec!(0));
    let id = draft.id;
    let now = chrono::Utc::now().into();
    let product = products::Model {
        id: Uuid::new_v4(),
        sku: "OIL-1L".into(),
        name: "Olive oil 1L".into(),
        description: None,
        kind: ProductKind::Merchandise,
        unit: "btl".into(),
        sale_price: dec!(10),
        unit_cost: dec!(6),
        quantity: dec!(10),
        reorder_level: dec!(0),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let items = vec![item(id, product.id, dec!(6)), item(id, product.id, dec!(6))];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![draft]])
        .append_query_results([items])
        .append_query_results([vec![product.clone()]])
        .into_connection();

    let err = SaleRepository::new(db).confirm(id, None).await.unwrap_err();
    assert!(matches!(
        err,
        SaleError::Rule(SaleRuleError::Inventory(InventoryError::ProductShortage {
            requested,
            ..
        })) if requested == dec!(12)
    ));
}

#[tokio::test]
async fn test_cancel_refused_with_payments() {
    let confirmed = sale(SaleStatus::Confirmed, dec!(50));
    let id = confirmed.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![confirmed]])
        .into_connection();

    let err = SaleRepository::new(db).cancel(id, None).await.unwrap_err();
    assert!(matches!(err, SaleError::Rule(SaleRuleError::HasPayments)));
}

#[tokio::test]
async fn test_payment_on_draft_refused() {
    let draft = sale(SaleStatus::Draft, dec!(0));
    let id = draft.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![draft]])
        .into_connection();

    let err = SaleRepository::new(db)
        .record_payment(id, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, SaleError::Rule(SaleRuleError::NotConfirmed)));
}
