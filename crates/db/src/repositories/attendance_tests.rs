//! Tests for the attendance repository.

use super::*;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};

#[tokio::test]
async fn test_duplicate_day_is_a_conflict() {
    let now = chrono::Utc::now().into();
    let employee_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let employee = employees::Model {
        id: employee_id,
        employee_code: "E-002".into(),
        first_name: "Youssef".into(),
        last_name: "Amrani".into(),
        email: None,
        phone: None,
        position: None,
        department: None,
        hire_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        termination_date: None,
        base_salary: dec!(4000),
        overtime_multiplier: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let existing = attendances::Model {
        id: Uuid::new_v4(),
        employee_id,
        date,
        status: AttendanceStatus::Present,
        overtime_hours: dec!(0),
        notes: None,
        created_at: now,
        updated_at: now,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![employee]])
        .append_query_results([vec![existing]])
        .into_connection();

    let err = AttendanceRepository::new(db)
        .create(CreateAttendanceInput {
            employee_id,
            date,
            status: AttendanceStatus::HalfDay,
            overtime_hours: dec!(0),
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::DuplicateDay(d) if d == date));
}

#[tokio::test]
async fn test_overtime_above_a_day_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = AttendanceRepository::new(db)
        .create(CreateAttendanceInput {
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            status: AttendanceStatus::Present,
            overtime_hours: dec!(25),
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttendanceError::Invalid(EmployeeError::InvalidOvertimeHours(_))
    ));
}
