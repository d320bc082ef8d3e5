//! Pay periods and working-day calendars.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::payroll::{PayrollError, PayrollPolicy};

/// A calendar month for which payroll is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl PayPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a month outside `1..=12` or an
    /// unrepresentable year.
    pub fn new(year: i32, month: u32) -> Result<Self, PayrollError> {
        let invalid = || PayrollError::InvalidPeriod { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// Year of the period.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of the period (1..=12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns true if the date falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

impl std::fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Returns true if the policy treats the date as a working day.
#[must_use]
pub fn is_workday(date: NaiveDate, policy: &PayrollPolicy) -> bool {
    match date.weekday() {
        Weekday::Sun => false,
        Weekday::Sat => policy.saturday_is_workday,
        _ => true,
    }
}

/// Counts working days in `from..=to`. An inverted range counts zero.
#[must_use]
pub fn working_days(from: NaiveDate, to: NaiveDate, policy: &PayrollPolicy) -> u32 {
    let count = from
        .iter_days()
        .take_while(|day| *day <= to)
        .filter(|day| is_workday(*day, policy))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_bounds() {
        let feb = PayPeriod::new(2028, 2).unwrap();
        assert_eq!(feb.first_day(), date(2028, 2, 1));
        assert_eq!(feb.last_day(), date(2028, 2, 29));

        let dec = PayPeriod::new(2026, 12).unwrap();
        assert_eq!(dec.last_day(), date(2026, 12, 31));
        assert_eq!(dec.to_string(), "2026-12");
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            PayPeriod::new(2026, 13),
            Err(PayrollError::InvalidPeriod {
                year: 2026,
                month: 13
            })
        );
        assert!(PayPeriod::new(2026, 0).is_err());
    }

    #[test]
    fn test_working_days() {
        let five_day = PayrollPolicy::default();
        let six_day = PayrollPolicy {
            saturday_is_workday: true,
            ..PayrollPolicy::default()
        };
        // June 2026 starts on a Monday.
        assert_eq!(working_days(date(2026, 6, 1), date(2026, 6, 30), &five_day), 22);
        assert_eq!(working_days(date(2026, 6, 1), date(2026, 6, 30), &six_day), 26);
        assert_eq!(working_days(date(2026, 6, 15), date(2026, 6, 30), &five_day), 12);
        assert_eq!(working_days(date(2026, 6, 30), date(2026, 6, 1), &five_day), 0);
    }
}
