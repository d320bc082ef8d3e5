//! Property-based tests for payroll.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{AttendanceDay, AttendanceStatus, PayPeriod, PayrollInput, PayrollPolicy, compute_payroll};

fn status() -> impl Strategy<Value = AttendanceStatus> {
    prop_oneof![
        Just(AttendanceStatus::Present),
        Just(AttendanceStatus::HalfDay),
        Just(AttendanceStatus::Leave),
        Just(AttendanceStatus::Absent),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Without overtime or bonus, pay never exceeds the base salary.
    #[test]
    fn prop_prorated_never_exceeds_base(
        month in 1u32..=12,
        base_cents in 0i64..100_000_000,
        statuses in prop::collection::vec(status(), 28..=31),
    ) {
        let period = PayPeriod::new(2026, month).unwrap();
        let attendance: Vec<AttendanceDay> = period
            .first_day()
            .iter_days()
            .take_while(|d| *d <= period.last_day())
            .zip(statuses)
            .map(|(date, status)| AttendanceDay { date, status, overtime_hours: Decimal::ZERO })
            .collect();
        let input = PayrollInput {
            base_salary: Decimal::new(base_cents, 2),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            termination_date: None,
            overtime_multiplier: None,
            attendance,
            bonus: Decimal::ZERO,
            deductions: Decimal::ZERO,
        };

        let result = compute_payroll(&period, &input, &PayrollPolicy::default()).unwrap();
        prop_assert!(result.net_salary >= Decimal::ZERO);
        prop_assert!(result.net_salary <= input.base_salary);
        prop_assert!(result.days_worked <= result.period_days);
    }
}
