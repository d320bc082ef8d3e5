//! Tests for the payroll repository.

use super::*;
use comptoir_core::InvalidTransition;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

fn payroll(status: PayrollStatus) -> payrolls::Model {
    let now = chrono::Utc::now().into();
    payrolls::Model {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        period_year: 2026,
        period_month: 9,
        period_days: dec!(22),
        days_worked: dec!(22),
        base_salary: dec!(4400),
        prorated_salary: dec!(4400),
        hourly_rate: dec!(25),
        overtime_hours: dec!(0),
        overtime_pay: dec!(0),
        bonus: dec!(0),
        deductions: dec!(0),
        gross_salary: dec!(4400),
        net_salary: dec!(4400),
        status,
        paid_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_paid_rows_cannot_be_adjusted() {
    let row = payroll(PayrollStatus::Paid);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let err = PayrollRepository::new(db)
        .adjust(row.id, Some(dec!(100)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PayrollRepoError::Rule(PayrollError::Transition(InvalidTransition { .. }))
    ));
}

#[tokio::test]
async fn test_deductions_above_gross_rejected() {
    let row = payroll(PayrollStatus::Draft);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let err = PayrollRepository::new(db)
        .adjust(row.id, None, Some(dec!(5000)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PayrollRepoError::Rule(PayrollError::NegativeNetSalary(_))
    ));
}

#[tokio::test]
async fn test_adjust_recomputes_totals() {
    let row = payroll(PayrollStatus::Draft);
    let updated = payrolls::Model {
        bonus: dec!(200),
        deductions: dec!(50),
        gross_salary: dec!(4600),
        net_salary: dec!(4550),
        ..row.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![updated]])
        .into_connection();

    let adjusted = PayrollRepository::new(db)
        .adjust(row.id, Some(dec!(200)), Some(dec!(50)))
        .await
        .unwrap();
    assert_eq!(adjusted.net_salary, dec!(4550));
}

fn locked_in_transaction(db: DatabaseConnection) -> bool {
    let log = format!("{:?}", db.into_transaction_log());
    log.contains("FOR UPDATE")
}

#[tokio::test]
async fn test_pay_locks_the_row() {
    let row = payroll(PayrollStatus::Draft);
    let paid = payrolls::Model {
        status: PayrollStatus::Paid,
        paid_at: Some(chrono::Utc::now().into()),
        ..row.clone()
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![paid]])
        .into_connection();

    let result = PayrollRepository::new(db.clone()).pay(row.id).await.unwrap();
    assert_eq!(result.status, PayrollStatus::Paid);
    assert!(locked_in_transaction(db));
}

#[tokio::test]
async fn test_paid_row_is_not_paid_twice() {
    let row = payroll(PayrollStatus::Paid);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let err = PayrollRepository::new(db.clone()).pay(row.id).await.unwrap_err();
    assert!(matches!(
        err,
        PayrollRepoError::Rule(PayrollError::Transition(_))
    ));
    assert!(locked_in_transaction(db));
}

#[tokio::test]
async fn test_adjust_locks_the_row() {
    let row = payroll(PayrollStatus::Draft);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![row.clone()]])
        .into_connection();

    PayrollRepository::new(db.clone())
        .adjust(row.id, Some(dec!(0)), None)
        .await
        .unwrap();
    assert!(locked_in_transaction(db));
}

#[tokio::test]
async fn test_delete_locks_and_refuses_paid_rows() {
    let draft = payroll(PayrollStatus::Draft);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![draft.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    PayrollRepository::new(db.clone())
        .delete(draft.id)
        .await
        .unwrap();
    assert!(locked_in_transaction(db));

    let paid = payroll(PayrollStatus::Paid);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![paid.clone()]])
        .into_connection();
    assert!(matches!(
        PayrollRepository::new(db).delete(paid.id).await,
        Err(PayrollRepoError::Rule(PayrollError::Transition(_)))
    ));
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<payrolls::Model>::new()])
        .into_connection();
    assert!(matches!(
        PayrollRepository::new(db).pay(id).await,
        Err(PayrollRepoError::NotFound(missing)) if missing == id
    ));
}
