//! Employee repository.

use chrono::NaiveDate;
use comptoir_core::hr::{EmployeeError, validate_employee};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation};
use crate::entities::{employees, payrolls};

/// Error types for employee persistence.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeRepoError {
    /// Employee not found.
    #[error("Employee not found: {0}")]
    NotFound(Uuid),

    /// Employee code already used.
    #[error("Employee code '{0}' already exists")]
    DuplicateCode(String),

    /// Employee has payroll history; deactivate instead.
    #[error("Cannot delete employee with payroll records; deactivate instead")]
    HasPayroll,

    /// Invalid field.
    #[error(transparent)]
    Invalid(#[from] EmployeeError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl EmployeeRepoError {
    fn from_write(err: DbErr, code: &str) -> Self {
        if is_unique_violation(&err) {
            Self::DuplicateCode(code.to_string())
        } else {
            Self::Database(err)
        }
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Unique staff code.
    pub employee_code: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Job title.
    pub position: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// First day of employment.
    pub hire_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Overtime multiplier override.
    pub overtime_multiplier: Option<Decimal>,
}

/// Input for updating an employee.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    /// Staff code.
    pub employee_code: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email.
    pub email: Option<Option<String>>,
    /// Phone.
    pub phone: Option<Option<String>>,
    /// Job title.
    pub position: Option<Option<String>>,
    /// Department.
    pub department: Option<Option<String>>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
    /// Termination date.
    pub termination_date: Option<Option<NaiveDate>>,
    /// Base salary.
    pub base_salary: Option<Decimal>,
    /// Overtime multiplier override.
    pub overtime_multiplier: Option<Option<Decimal>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Filter options for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Substring of the name or code.
    pub search: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an employee.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` or `Invalid`.
    pub async fn create(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, EmployeeRepoError> {
        validate_employee(
            input.base_salary,
            input.overtime_multiplier,
            input.hire_date,
            None,
        )?;
        let code = input.employee_code.trim().to_string();
        if self.find_by_code(&code).await?.is_some() {
            return Err(EmployeeRepoError::DuplicateCode(code));
        }

        let now = chrono::Utc::now().into();
        let employee = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_code: Set(code.clone()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            position: Set(input.position),
            department: Set(input.department),
            hire_date: Set(input.hire_date),
            termination_date: Set(None),
            base_salary: Set(input.base_salary),
            overtime_multiplier: Set(input.overtime_multiplier),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        employee
            .insert(&self.db)
            .await
            .map_err(|e| EmployeeRepoError::from_write(e, &code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find()
            .filter(employees::Column::EmployeeCode.eq(code))
            .one(&self.db)
            .await
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists employees by last name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<employees::Model>, DbErr> {
        let mut query = employees::Entity::find();
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(employees::Column::FirstName.contains(search))
                    .add(employees::Column::LastName.contains(search))
                    .add(employees::Column::EmployeeCode.contains(search)),
            );
        }
        if let Some(department) = &filter.department {
            query = query.filter(employees::Column::Department.eq(department.as_str()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(employees::Column::IsActive.eq(is_active));
        }
        let query = query
            .order_by_asc(employees::Column::LastName)
            .order_by_asc(employees::Column::FirstName);
        fetch_page(&self.db, query, page).await
    }

    /// Updates an employee; the contractual fields are re-validated together.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DuplicateCode` or `Invalid`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<employees::Model, EmployeeRepoError> {
        let employee = self
            .find_by_id(id)
            .await?
            .ok_or(EmployeeRepoError::NotFound(id))?;

        let base_salary = input.base_salary.unwrap_or(employee.base_salary);
        let multiplier = input
            .overtime_multiplier
            .unwrap_or(employee.overtime_multiplier);
        let hire_date = input.hire_date.unwrap_or(employee.hire_date);
        let termination = input
            .termination_date
            .unwrap_or(employee.termination_date);
        validate_employee(base_salary, multiplier, hire_date, termination)?;

        let mut code = employee.employee_code.clone();
        if let Some(new_code) = input.employee_code.as_deref().map(str::trim)
            && new_code != employee.employee_code
        {
            if self.find_by_code(new_code).await?.is_some() {
                return Err(EmployeeRepoError::DuplicateCode(new_code.to_string()));
            }
            code = new_code.to_string();
        }

        let mut active: employees::ActiveModel = employee.into();
        active.employee_code = Set(code.clone());
        active.base_salary = Set(base_salary);
        active.overtime_multiplier = Set(multiplier);
        active.hire_date = Set(hire_date);
        active.termination_date = Set(termination);
        if let Some(v) = input.first_name {
            active.first_name = Set(v);
        }
        if let Some(v) = input.last_name {
            active.last_name = Set(v);
        }
        if let Some(v) = input.email {
            active.email = Set(v);
        }
        if let Some(v) = input.phone {
            active.phone = Set(v);
        }
        if let Some(v) = input.position {
            active.position = Set(v);
        }
        if let Some(v) = input.department {
            active.department = Set(v);
        }
        if let Some(v) = input.is_active {
            active.is_active = Set(v);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| EmployeeRepoError::from_write(e, &code))
    }

    /// Deletes an employee without payroll history. Attendance rows go with
    /// the employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `HasPayroll`.
    pub async fn delete(&self, id: Uuid) -> Result<(), EmployeeRepoError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(EmployeeRepoError::NotFound(id));
        }
        let has_payroll = payrolls::Entity::find()
            .filter(payrolls::Column::EmployeeId.eq(id))
            .one(&self.db)
            .await?
            .is_some();
        if has_payroll {
            return Err(EmployeeRepoError::HasPayroll);
        }

        employees::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(employee_id = %id, "employee deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "employee_tests.rs"]
mod tests;
