//! Attendance repository: one row per employee per day.

use chrono::NaiveDate;
use comptoir_core::hr::{EmployeeError, validate_attendance};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation};
use crate::entities::{attendances, employees, sea_orm_active_enums::AttendanceStatus};

/// Error types for attendance operations.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// Attendance row not found.
    #[error("Attendance record not found: {0}")]
    NotFound(Uuid),

    /// Employee not found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(Uuid),

    /// A row already exists for that employee and day.
    #[error("Attendance already recorded for {0}")]
    DuplicateDay(NaiveDate),

    /// Invalid overtime.
    #[error(transparent)]
    Invalid(#[from] EmployeeError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording attendance.
#[derive(Debug, Clone)]
pub struct CreateAttendanceInput {
    /// Employee.
    pub employee_id: Uuid,
    /// Day.
    pub date: NaiveDate,
    /// Status.
    pub status: AttendanceStatus,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Notes.
    pub notes: Option<String>,
}

/// Input for correcting attendance.
#[derive(Debug, Clone, Default)]
pub struct UpdateAttendanceInput {
    /// Status.
    pub status: Option<AttendanceStatus>,
    /// Overtime hours.
    pub overtime_hours: Option<Decimal>,
    /// Notes.
    pub notes: Option<Option<String>>,
}

/// Filter options for listing attendance.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    /// Employee.
    pub employee_id: Option<Uuid>,
    /// From (inclusive).
    pub from: Option<NaiveDate>,
    /// To (inclusive).
    pub to: Option<NaiveDate>,
}

/// Attendance repository.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    db: DatabaseConnection,
}

impl AttendanceRepository {
    /// Creates a new attendance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records attendance.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound`, `DuplicateDay` or `Invalid`.
    pub async fn create(
        &self,
        input: CreateAttendanceInput,
    ) -> Result<attendances::Model, AttendanceError> {
        validate_attendance(input.overtime_hours)?;
        if employees::Entity::find_by_id(input.employee_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(AttendanceError::EmployeeNotFound(input.employee_id));
        }
        let existing = attendances::Entity::find()
            .filter(attendances::Column::EmployeeId.eq(input.employee_id))
            .filter(attendances::Column::Date.eq(input.date))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AttendanceError::DuplicateDay(input.date));
        }

        let now = chrono::Utc::now().into();
        let row = attendances::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            date: Set(input.date),
            status: Set(input.status),
            overtime_hours: Set(input.overtime_hours),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        row.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AttendanceError::DuplicateDay(input.date)
            } else {
                AttendanceError::Database(e)
            }
        })
    }

    /// Lists attendance, latest day first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &AttendanceFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<attendances::Model>, DbErr> {
        let mut query = attendances::Entity::find();
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(attendances::Column::EmployeeId.eq(employee_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendances::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendances::Column::Date.lte(to));
        }
        fetch_page(&self.db, query.order_by_desc(attendances::Column::Date), page).await
    }

    /// Corrects an attendance row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Invalid`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateAttendanceInput,
    ) -> Result<attendances::Model, AttendanceError> {
        let row = attendances::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::NotFound(id))?;

        let mut active: attendances::ActiveModel = row.into();
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(hours) = input.overtime_hours {
            validate_attendance(hours)?;
            active.overtime_hours = Set(hours);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an attendance row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<(), AttendanceError> {
        let result = attendances::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AttendanceError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
