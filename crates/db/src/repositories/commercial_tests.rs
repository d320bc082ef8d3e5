//! Tests for the commercial repository.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

#[tokio::test]
async fn test_create_rejects_rate_above_hundred() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = CommercialRepository::new(db);

    let err = repo
        .create(CreateCommercialInput {
            name: "Karim".into(),
            phone: None,
            email: None,
            vehicle_plate: None,
            commission_rate: dec!(120),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommercialError::Invalid(PartnerError::InvalidCommissionRate(_))
    ));
}

#[tokio::test]
async fn test_delete_refused_with_van_sales() {
    let now = chrono::Utc::now().into();
    let id = Uuid::new_v4();
    let commercial = commercials::Model {
        id,
        name: "Karim".into(),
        phone: None,
        email: None,
        vehicle_plate: Some("123-A-45".into()),
        commission_rate: dec!(2),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let van = van_sales::Model {
        id: Uuid::new_v4(),
        reference: "VAN-20261018-0001".into(),
        commercial_id: id,
        status: crate::entities::sea_orm_active_enums::VanSaleStatus::Loaded,
        load_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        total_amount: dec!(0),
        cash_collected: None,
        discrepancy: None,
        notes: None,
        created_by: None,
        reconciled_at: None,
        created_at: now,
        updated_at: now,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![commercial]])
        .append_query_results([vec![van]])
        .into_connection();

    let err = CommercialRepository::new(db).delete(id).await.unwrap_err();
    assert!(matches!(err, CommercialError::InUse("van sales")));
}
