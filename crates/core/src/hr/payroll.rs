//! Monthly payroll computation.

use chrono::NaiveDate;
use comptoir_shared::config::PayrollConfig;
use comptoir_shared::types::{
    MONEY_SCALE, OutOfRange, checked_cost, checked_money, ensure_fits,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::period::{PayPeriod, is_workday, working_days};
use super::types::{AttendanceStatus, PayrollStatus};
use crate::InvalidTransition;

/// Payroll errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayrollError {
    /// Month outside 1..=12.
    #[error("Invalid pay period {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The employee was not employed during any day of the period.
    #[error("Employee was not employed during {0}")]
    NotEmployedInPeriod(String),

    /// The policy leaves no working day in the period.
    #[error("Pay period has no working days")]
    NoWorkingDays,

    /// Standard hours or overtime multiplier are not positive.
    #[error("Payroll policy is invalid: {0}")]
    InvalidPolicy(&'static str),

    /// Bonus or deductions are negative.
    #[error("Bonus and deductions cannot be negative")]
    NegativeAdjustment,

    /// Deductions exceed gross pay.
    #[error("Net salary would be negative ({0})")]
    NegativeNetSalary(Decimal),

    /// Status change not allowed.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// An amount does not fit its column.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

/// Payroll rules taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Contractual hours per working day.
    pub standard_hours_per_day: Decimal,
    /// Default overtime multiplier.
    pub overtime_multiplier: Decimal,
    /// Whether Saturday is a working day.
    pub saturday_is_workday: bool,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self::from(&PayrollConfig::default())
    }
}

impl From<&PayrollConfig> for PayrollPolicy {
    fn from(config: &PayrollConfig) -> Self {
        Self {
            standard_hours_per_day: config.standard_hours_per_day,
            overtime_multiplier: config.overtime_multiplier,
            saturday_is_workday: config.saturday_is_workday,
        }
    }
}

impl PayrollPolicy {
    /// Checks that hours and multiplier are positive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` naming the offending field.
    pub fn validate(&self) -> Result<(), PayrollError> {
        if self.standard_hours_per_day <= Decimal::ZERO {
            return Err(PayrollError::InvalidPolicy("standard_hours_per_day"));
        }
        if self.overtime_multiplier <= Decimal::ZERO {
            return Err(PayrollError::InvalidPolicy("overtime_multiplier"));
        }
        Ok(())
    }
}

/// One attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    /// Day concerned.
    pub date: NaiveDate,
    /// Status recorded.
    pub status: AttendanceStatus,
    /// Hours worked beyond the standard day.
    pub overtime_hours: Decimal,
}

/// Everything needed to compute one employee's payroll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollInput {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// First day of employment.
    pub hire_date: NaiveDate,
    /// Last day of employment, if any.
    pub termination_date: Option<NaiveDate>,
    /// Per-employee overtime multiplier override.
    pub overtime_multiplier: Option<Decimal>,
    /// Attendance rows; rows outside the employment window are ignored.
    pub attendance: Vec<AttendanceDay>,
    /// Bonus to add.
    pub bonus: Decimal,
    /// Deductions to subtract.
    pub deductions: Decimal,
}

/// Computed payroll figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayrollBreakdown {
    /// Working days of the whole period.
    pub period_days: Decimal,
    /// Paid days earned.
    pub days_worked: Decimal,
    /// `base · days_worked / period_days`.
    pub prorated_salary: Decimal,
    /// Base salary per standard hour (4 dp).
    pub hourly_rate: Decimal,
    /// Overtime hours inside the window.
    pub overtime_hours: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Bonus.
    pub bonus: Decimal,
    /// Deductions.
    pub deductions: Decimal,
    /// Prorated salary + overtime + bonus.
    pub gross_salary: Decimal,
    /// Gross − deductions.
    pub net_salary: Decimal,
}

/// Gross and net pay from their components.
///
/// # Errors
///
/// Returns an error for negative or oversize bonus/deductions, a gross that
/// does not fit a money column, or a negative net.
pub fn net_pay(
    prorated_salary: Decimal,
    overtime_pay: Decimal,
    bonus: Decimal,
    deductions: Decimal,
) -> Result<(Decimal, Decimal), PayrollError> {
    if bonus < Decimal::ZERO || deductions < Decimal::ZERO {
        return Err(PayrollError::NegativeAdjustment);
    }
    ensure_fits(bonus, MONEY_SCALE, "bonus")?;
    ensure_fits(deductions, MONEY_SCALE, "deductions")?;
    let gross = checked_money(
        prorated_salary
            .checked_add(overtime_pay)
            .and_then(|g| g.checked_add(bonus)),
        "gross salary",
    )?;
    let net = checked_money(gross.checked_sub(deductions), "net salary")?;
    if net < Decimal::ZERO {
        return Err(PayrollError::NegativeNetSalary(net));
    }
    Ok((gross, net))
}

/// Computes an employee's payroll for a period.
///
/// # Errors
///
/// Returns an error when the policy is invalid, the period has no working
/// day, the employee was not employed in the period, or the net is negative.
pub fn compute_payroll(
    period: &PayPeriod,
    input: &PayrollInput,
    policy: &PayrollPolicy,
) -> Result<PayrollBreakdown, PayrollError> {
    policy.validate()?;

    let window_start = input.hire_date.max(period.first_day());
    let window_end = input
        .termination_date
        .map_or(period.last_day(), |end| end.min(period.last_day()));
    if window_start > window_end {
        return Err(PayrollError::NotEmployedInPeriod(period.to_string()));
    }

    let period_days = Decimal::from(working_days(period.first_day(), period.last_day(), policy));
    if period_days.is_zero() {
        return Err(PayrollError::NoWorkingDays);
    }
    let window_days = Decimal::from(working_days(window_start, window_end, policy));

    let in_window = input
        .attendance
        .iter()
        .filter(|day| day.date >= window_start && day.date <= window_end);

    let mut credits = Decimal::ZERO;
    let mut overtime_hours = Decimal::ZERO;
    for day in in_window {
        if is_workday(day.date, policy) {
            credits += day.status.credit();
        }
        overtime_hours += day.overtime_hours.max(Decimal::ZERO);
    }
    let days_worked = credits.min(window_days);

    let base = ensure_fits(input.base_salary, MONEY_SCALE, "base salary")?;
    let prorated_salary = checked_money(
        base.checked_mul(days_worked)
            .and_then(|v| v.checked_div(period_days)),
        "prorated salary",
    )?;
    let hourly = period_days
        .checked_mul(policy.standard_hours_per_day)
        .and_then(|hours| base.checked_div(hours));
    let multiplier = input
        .overtime_multiplier
        .unwrap_or(policy.overtime_multiplier);
    let overtime_pay = checked_money(
        hourly
            .and_then(|rate| overtime_hours.checked_mul(rate))
            .and_then(|v| v.checked_mul(multiplier)),
        "overtime pay",
    )?;
    let hourly_rate = checked_cost(hourly, "hourly rate")?;

    let (gross_salary, net_salary) =
        net_pay(prorated_salary, overtime_pay, input.bonus, input.deductions)?;

    Ok(PayrollBreakdown {
        period_days,
        days_worked,
        prorated_salary,
        hourly_rate,
        overtime_hours,
        overtime_pay,
        bonus: input.bonus,
        deductions: input.deductions,
        gross_salary,
        net_salary,
    })
}

/// Draft → Paid.
///
/// # Errors
///
/// Returns `InvalidTransition` for rows already paid.
pub fn mark_paid(current: PayrollStatus) -> Result<PayrollStatus, PayrollError> {
    match current {
        PayrollStatus::Draft => Ok(PayrollStatus::Paid),
        PayrollStatus::Paid => Err(InvalidTransition::new("payroll", "paid", "paid").into()),
    }
}

/// Only draft payrolls may be adjusted or deleted.
///
/// # Errors
///
/// Returns `InvalidTransition` for paid rows.
pub fn ensure_editable(current: PayrollStatus) -> Result<(), PayrollError> {
    if current.is_editable() {
        Ok(())
    } else {
        Err(InvalidTransition::new("payroll", current.as_str(), "draft").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june() -> PayPeriod {
        PayPeriod::new(2026, 6).unwrap()
    }

    fn attendance(from: NaiveDate, to: NaiveDate, status: AttendanceStatus) -> Vec<AttendanceDay> {
        let policy = PayrollPolicy::default();
        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| is_workday(*d, &policy))
            .map(|date| AttendanceDay {
                date,
                status,
                overtime_hours: Decimal::ZERO,
            })
            .collect()
    }

    fn input(attendance: Vec<AttendanceDay>) -> PayrollInput {
        PayrollInput {
            base_salary: dec!(3000),
            hire_date: date(2020, 1, 1),
            termination_date: None,
            overtime_multiplier: None,
            attendance,
            bonus: Decimal::ZERO,
            deductions: Decimal::ZERO,
        }
    }

    #[test]
    fn test_full_attendance_pays_base_salary() {
        let days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        let result = compute_payroll(&june(), &input(days), &PayrollPolicy::default()).unwrap();

        assert_eq!(result.period_days, dec!(22));
        assert_eq!(result.days_worked, dec!(22));
        assert_eq!(result.prorated_salary, dec!(3000));
        assert_eq!(result.overtime_pay, dec!(0));
        assert_eq!(result.net_salary, dec!(3000));
    }

    #[test]
    fn test_leave_is_paid_and_half_days_count_half() {
        let mut days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Leave);
        for day in days.iter_mut().take(4) {
            day.status = AttendanceStatus::HalfDay;
        }
        let result = compute_payroll(&june(), &input(days), &PayrollPolicy::default()).unwrap();
        assert_eq!(result.days_worked, dec!(20));
    }

    #[test]
    fn test_no_attendance_pays_nothing() {
        let result = compute_payroll(&june(), &input(vec![]), &PayrollPolicy::default()).unwrap();
        assert_eq!(result.days_worked, dec!(0));
        assert_eq!(result.net_salary, dec!(0));
    }

    #[test]
    fn test_overtime() {
        let mut days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        days[0].overtime_hours = dec!(4);
        days[1].overtime_hours = dec!(6);
        let result = compute_payroll(&june(), &input(days), &PayrollPolicy::default()).unwrap();

        // 3000 / (22 * 8) = 17.0454..., 10h * 1.5
        assert_eq!(result.hourly_rate, dec!(17.0455));
        assert_eq!(result.overtime_hours, dec!(10));
        assert_eq!(result.overtime_pay, dec!(255.68));
        assert_eq!(result.gross_salary, dec!(3255.68));
    }

    #[test]
    fn test_employee_multiplier_override() {
        let mut days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        days[0].overtime_hours = dec!(8.8);
        let mut data = input(days);
        data.overtime_multiplier = Some(dec!(2));
        let result = compute_payroll(&june(), &data, &PayrollPolicy::default()).unwrap();
        // 8.8h * 17.0454... * 2 = 300
        assert_eq!(result.overtime_pay, dec!(300));
    }

    #[test]
    fn test_mid_month_hire_is_prorated() {
        let days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        let mut data = input(days);
        data.hire_date = date(2026, 6, 15);
        let result = compute_payroll(&june(), &data, &PayrollPolicy::default()).unwrap();

        // attendance before the hire date is ignored
        assert_eq!(result.days_worked, dec!(12));
        assert_eq!(result.prorated_salary, dec!(1636.36));
    }

    #[test]
    fn test_not_employed_in_period() {
        let mut data = input(vec![]);
        data.hire_date = date(2026, 7, 1);
        assert!(matches!(
            compute_payroll(&june(), &data, &PayrollPolicy::default()),
            Err(PayrollError::NotEmployedInPeriod(_))
        ));

        let mut data = input(vec![]);
        data.termination_date = Some(date(2026, 5, 31));
        assert!(matches!(
            compute_payroll(&june(), &data, &PayrollPolicy::default()),
            Err(PayrollError::NotEmployedInPeriod(_))
        ));
    }

    #[test]
    fn test_bonus_and_deductions() {
        let days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        let mut data = input(days);
        data.bonus = dec!(200);
        data.deductions = dec!(150.5);
        let result = compute_payroll(&june(), &data, &PayrollPolicy::default()).unwrap();
        assert_eq!(result.gross_salary, dec!(3200));
        assert_eq!(result.net_salary, dec!(3049.5));

        data.deductions = dec!(5000);
        assert!(matches!(
            compute_payroll(&june(), &data, &PayrollPolicy::default()),
            Err(PayrollError::NegativeNetSalary(_))
        ));
    }

    #[test]
    fn test_net_pay_rejects_negative_adjustments() {
        assert_eq!(
            net_pay(dec!(100), dec!(0), dec!(-1), dec!(0)),
            Err(PayrollError::NegativeAdjustment)
        );
        assert_eq!(
            net_pay(dec!(100), dec!(10), dec!(5), dec!(15)).unwrap(),
            (dec!(115), dec!(100))
        );
    }

    #[test]
    fn test_oversize_pay_is_rejected() {
        let mut days = attendance(date(2026, 6, 1), date(2026, 6, 30), AttendanceStatus::Present);
        days[0].overtime_hours = dec!(999.99);
        let mut data = input(days);
        data.base_salary = dec!(9999999999999999.99);
        assert!(matches!(
            compute_payroll(&june(), &data, &PayrollPolicy::default()),
            Err(PayrollError::OutOfRange(_))
        ));

        assert!(matches!(
            net_pay(dec!(100), dec!(0), dec!(10000000000000000), dec!(0)),
            Err(PayrollError::OutOfRange(_))
        ));
        assert!(matches!(
            net_pay(dec!(9999999999999999), dec!(0), dec!(1), dec!(0)),
            Err(PayrollError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_invalid_policy() {
        let policy = PayrollPolicy {
            standard_hours_per_day: dec!(0),
            ..PayrollPolicy::default()
        };
        assert_eq!(
            compute_payroll(&june(), &input(vec![]), &policy),
            Err(PayrollError::InvalidPolicy("standard_hours_per_day"))
        );
    }

    #[test]
    fn test_mark_paid() {
        assert_eq!(mark_paid(PayrollStatus::Draft).unwrap(), PayrollStatus::Paid);
        assert!(mark_paid(PayrollStatus::Paid).is_err());
        assert!(ensure_editable(PayrollStatus::Draft).is_ok());
        assert!(ensure_editable(PayrollStatus::Paid).is_err());
    }
}
