//! Tests for the common repository.

use super::*;

#[test]
fn test_format_reference() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    assert_eq!(format_reference("PO", date, 7), "PO-20261018-0007");
    assert_eq!(format_reference("VAN", date, 12345), "VAN-20261018-12345");
}

#[test]
fn test_plain_errors_are_not_conflicts() {
    let err = DbErr::RecordNotFound("x".into());
    assert!(!is_unique_violation(&err));
    assert!(!is_foreign_key_violation(&err));
}
