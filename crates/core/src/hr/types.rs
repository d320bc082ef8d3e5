//! HR enums.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance status of an employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked the full day.
    Present,
    /// Worked half the day.
    HalfDay,
    /// Paid leave.
    Leave,
    /// Did not work, unpaid.
    Absent,
}

impl AttendanceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::HalfDay => "half_day",
            Self::Leave => "leave",
            Self::Absent => "absent",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "half_day" => Some(Self::HalfDay),
            "leave" => Some(Self::Leave),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }

    /// Paid days credited for this status.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self {
            Self::Present | Self::Leave => Decimal::ONE,
            Self::HalfDay => Decimal::new(5, 1),
            Self::Absent => Decimal::ZERO,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payroll row status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Computed, can still be adjusted or deleted.
    Draft,
    /// Paid out (final).
    Paid,
}

impl PayrollStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Returns true if the row can still be adjusted or deleted.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AttendanceStatus::Present, dec!(1))]
    #[case(AttendanceStatus::HalfDay, dec!(0.5))]
    #[case(AttendanceStatus::Leave, dec!(1))]
    #[case(AttendanceStatus::Absent, dec!(0))]
    fn test_credit(#[case] status: AttendanceStatus, #[case] expected: Decimal) {
        assert_eq!(status.credit(), expected);
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::HalfDay,
            AttendanceStatus::Leave,
            AttendanceStatus::Absent,
        ] {
            assert_eq!(AttendanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::parse("sick"), None);
    }
}
