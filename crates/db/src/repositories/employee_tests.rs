//! Tests for the employee repository.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

#[tokio::test]
async fn test_create_rejects_negative_salary() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = EmployeeRepository::new(db)
        .create(CreateEmployeeInput {
            employee_code: "E-001".into(),
            first_name: "Nadia".into(),
            last_name: "Benali".into(),
            email: None,
            phone: None,
            position: None,
            department: None,
            hire_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            base_salary: dec!(-1),
            overtime_multiplier: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EmployeeRepoError::Invalid(EmployeeError::NegativeSalary)
    ));
}
