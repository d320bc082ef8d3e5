//! Human resources: employees, attendance and payroll.
//!
//! Payroll is computed from the monthly base salary, pro-rated by the
//! attendance credits earned inside the employment window, plus overtime
//! paid at a multiple of the hourly rate.

mod employee;
mod payroll;
mod period;
mod types;

#[cfg(test)]
mod props;

pub use employee::{EmployeeError, validate_attendance, validate_employee};
pub use payroll::{
    AttendanceDay, PayrollBreakdown, PayrollError, PayrollInput, PayrollPolicy, compute_payroll,
    ensure_editable, mark_paid, net_pay,
};
pub use period::{PayPeriod, working_days};
pub use types::{AttendanceStatus, PayrollStatus};
