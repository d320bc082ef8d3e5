//! Tests for the purchase repository.

use super::*;
use comptoir_core::InvalidTransition;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

fn purchase(status: PurchaseStatus) -> purchases::Model {
    let now = chrono::Utc::now().into();
    purchases::Model {
        id: Uuid::new_v4(),
        reference: "PO-20261018-0001".into(),
        supplier_id: Uuid::new_v4(),
        status,
        order_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        expected_date: None,
        received_date: None,
        total_amount: dec!(100),
        notes: None,
        created_by: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_receive_requires_confirmation() {
    let draft = purchase(PurchaseStatus::Draft);
    let id = draft.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![draft]])
        .into_connection();

    let err = PurchaseRepository::new(db)
        .receive(id, &[], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PurchaseError::Rule(PurchaseRuleError::Transition(InvalidTransition { .. }))
    ));
}

#[tokio::test]
async fn test_delete_refuses_confirmed_order() {
    let confirmed = purchase(PurchaseStatus::Confirmed);
    let id = confirmed.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![confirmed]])
        .into_connection();

    let err = PurchaseRepository::new(db).delete(id).await.unwrap_err();
    assert!(matches!(err, PurchaseError::Rule(_)));
}

#[tokio::test]
async fn test_create_rejects_empty_order_before_touching_db() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = PurchaseRepository::new(db)
        .create(
            PurchaseInput {
                supplier_id: Uuid::new_v4(),
                order_date: None,
                expected_date: None,
                notes: None,
                items: vec![],
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PurchaseError::Rule(PurchaseRuleError::NoItems)));
}
