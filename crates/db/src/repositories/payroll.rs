//! Payroll repository: monthly generation and draft maintenance.

use std::collections::HashSet;

use comptoir_core::hr::{
    self, AttendanceDay, PayPeriod, PayrollError, PayrollInput, PayrollPolicy, compute_payroll,
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation};
use crate::entities::{attendances, employees, payrolls, sea_orm_active_enums::PayrollStatus};

/// Error types for payroll persistence.
#[derive(Debug, thiserror::Error)]
pub enum PayrollRepoError {
    /// Payroll row not found.
    #[error("Payroll not found: {0}")]
    NotFound(Uuid),

    /// Another run created the employee's row for the period first.
    #[error("Payroll for employee {employee_id} already exists for {period}")]
    AlreadyGenerated {
        /// Employee concerned.
        employee_id: Uuid,
        /// Period in `YYYY-MM` form.
        period: String,
    },

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] PayrollError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Why an employee got no new payroll row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A row already exists for the period.
    AlreadyGenerated,
    /// Hired after or terminated before the period.
    NotEmployed,
}

/// Employee left out of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEmployee {
    /// Employee ID.
    pub employee_id: Uuid,
    /// Employee code.
    pub employee_code: String,
    /// Reason.
    pub reason: SkipReason,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Period in `YYYY-MM` form.
    pub period: String,
    /// Rows created.
    pub generated: Vec<payrolls::Model>,
    /// Employees left out.
    pub skipped: Vec<SkippedEmployee>,
}

/// Filter options for listing payroll rows.
#[derive(Debug, Clone, Default)]
pub struct PayrollFilter {
    /// Period year.
    pub year: Option<i32>,
    /// Period month.
    pub month: Option<u32>,
    /// Employee.
    pub employee_id: Option<Uuid>,
    /// Status.
    pub status: Option<PayrollStatus>,
}

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates draft payrolls for every active employee of the period.
    ///
    /// Employees already paid or drafted for the period, and employees whose
    /// contract does not overlap it, are reported as skipped. All rows are
    /// written in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `Rule` if the computation fails for an employee (for example a
    /// policy without working days), or `AlreadyGenerated` when a concurrent
    /// run inserted the same row first; nothing is written in either case.
    pub async fn generate(
        &self,
        period: &PayPeriod,
        policy: &PayrollPolicy,
    ) -> Result<GenerationReport, PayrollRepoError> {
        policy.validate()?;
        let year = period.year();
        let month = period.month().cast_signed();

        let txn = self.db.begin().await?;

        let staff = employees::Entity::find()
            .filter(employees::Column::IsActive.eq(true))
            .order_by_asc(employees::Column::EmployeeCode)
            .all(&txn)
            .await?;

        let existing: HashSet<Uuid> = payrolls::Entity::find()
            .select_only()
            .column(payrolls::Column::EmployeeId)
            .filter(payrolls::Column::PeriodYear.eq(year))
            .filter(payrolls::Column::PeriodMonth.eq(month))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let now = chrono::Utc::now().into();
        let mut generated = Vec::new();
        let mut skipped = Vec::new();

        for employee in staff {
            let skip = |reason| SkippedEmployee {
                employee_id: employee.id,
                employee_code: employee.employee_code.clone(),
                reason,
            };
            if existing.contains(&employee.id) {
                skipped.push(skip(SkipReason::AlreadyGenerated));
                continue;
            }
            let employed = employee.hire_date <= period.last_day()
                && employee
                    .termination_date
                    .is_none_or(|end| end >= period.first_day());
            if !employed {
                skipped.push(skip(SkipReason::NotEmployed));
                continue;
            }

            let attendance = attendances::Entity::find()
                .filter(attendances::Column::EmployeeId.eq(employee.id))
                .filter(attendances::Column::Date.gte(period.first_day()))
                .filter(attendances::Column::Date.lte(period.last_day()))
                .all(&txn)
                .await?
                .into_iter()
                .map(|row| AttendanceDay {
                    date: row.date,
                    status: row.status.into(),
                    overtime_hours: row.overtime_hours,
                })
                .collect();

            let input = PayrollInput {
                base_salary: employee.base_salary,
                hire_date: employee.hire_date,
                termination_date: employee.termination_date,
                overtime_multiplier: employee.overtime_multiplier,
                attendance,
                bonus: Decimal::ZERO,
                deductions: Decimal::ZERO,
            };
            let pay = compute_payroll(period, &input, policy)?;

            let row = payrolls::ActiveModel {
                id: Set(Uuid::new_v4()),
                employee_id: Set(employee.id),
                period_year: Set(year),
                period_month: Set(month),
                period_days: Set(pay.period_days),
                days_worked: Set(pay.days_worked),
                base_salary: Set(employee.base_salary),
                prorated_salary: Set(pay.prorated_salary),
                hourly_rate: Set(pay.hourly_rate),
                overtime_hours: Set(pay.overtime_hours),
                overtime_pay: Set(pay.overtime_pay),
                bonus: Set(pay.bonus),
                deductions: Set(pay.deductions),
                gross_salary: Set(pay.gross_salary),
                net_salary: Set(pay.net_salary),
                status: Set(PayrollStatus::Draft),
                paid_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PayrollRepoError::AlreadyGenerated {
                        employee_id: employee.id,
                        period: period.to_string(),
                    }
                } else {
                    PayrollRepoError::Database(e)
                }
            })?;
            generated.push(row);
        }

        txn.commit().await?;

        info!(
            period = %period,
            generated = generated.len(),
            skipped = skipped.len(),
            "payroll generated"
        );
        Ok(GenerationReport {
            period: period.to_string(),
            generated,
            skipped,
        })
    }

    /// Finds a payroll row by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<payrolls::Model>, DbErr> {
        payrolls::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists payroll rows, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PayrollFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<payrolls::Model>, DbErr> {
        let mut query = payrolls::Entity::find();
        if let Some(year) = filter.year {
            query = query.filter(payrolls::Column::PeriodYear.eq(year));
        }
        if let Some(month) = filter.month {
            query = query.filter(payrolls::Column::PeriodMonth.eq(month.cast_signed()));
        }
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(payrolls::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(payrolls::Column::Status.eq(status));
        }
        let query = query
            .order_by_desc(payrolls::Column::PeriodYear)
            .order_by_desc(payrolls::Column::PeriodMonth)
            .order_by_asc(payrolls::Column::EmployeeId);
        fetch_page(&self.db, query, page).await
    }

    /// Replaces the bonus and deductions of a draft and recomputes the totals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for a paid row, negative amounts or a
    /// negative net.
    pub async fn adjust(
        &self,
        id: Uuid,
        bonus: Option<Decimal>,
        deductions: Option<Decimal>,
    ) -> Result<payrolls::Model, PayrollRepoError> {
        let txn = self.db.begin().await?;
        let payroll = lock_payroll(&txn, id).await?;
        hr::ensure_editable(payroll.status.into())?;

        let bonus = bonus.unwrap_or(payroll.bonus);
        let deductions = deductions.unwrap_or(payroll.deductions);
        let (gross, net) = hr::net_pay(
            payroll.prorated_salary,
            payroll.overtime_pay,
            bonus,
            deductions,
        )?;

        let mut active: payrolls::ActiveModel = payroll.into();
        active.bonus = Set(bonus);
        active.deductions = Set(deductions);
        active.gross_salary = Set(gross);
        active.net_salary = Set(net);
        active.updated_at = Set(chrono::Utc::now().into());
        let adjusted = active.update(&txn).await?;
        txn.commit().await?;
        Ok(adjusted)
    }

    /// Marks a draft as paid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` if the row is already paid.
    pub async fn pay(&self, id: Uuid) -> Result<payrolls::Model, PayrollRepoError> {
        let txn = self.db.begin().await?;
        let payroll = lock_payroll(&txn, id).await?;
        let status = hr::mark_paid(payroll.status.into())?;

        let now = chrono::Utc::now().into();
        let mut active: payrolls::ActiveModel = payroll.into();
        active.status = Set(status.into());
        active.paid_at = Set(Some(now));
        active.updated_at = Set(now);
        let paid = active.update(&txn).await?;
        txn.commit().await?;

        info!(payroll_id = %id, net = %paid.net_salary, "payroll paid");
        Ok(paid)
    }

    /// Deletes a draft.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for a paid row.
    pub async fn delete(&self, id: Uuid) -> Result<(), PayrollRepoError> {
        let txn = self.db.begin().await?;
        let payroll = lock_payroll(&txn, id).await?;
        hr::ensure_editable(payroll.status.into())?;
        payrolls::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

async fn lock_payroll<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<payrolls::Model, PayrollRepoError> {
    payrolls::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(PayrollRepoError::NotFound(id))
}

#[cfg(test)]
#[path = "payroll_tests.rs"]
mod tests;
