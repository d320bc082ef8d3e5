//! Employees, attendance and payroll routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use comptoir_core::hr::PayPeriod;
use comptoir_db::{
    entities::{
        attendances, employees, payrolls,
        sea_orm_active_enums::{AttendanceStatus, PayrollStatus},
    },
    repositories::{
        AttendanceFilter, AttendanceRepository, CreateAttendanceInput, CreateEmployeeInput,
        EmployeeFilter, EmployeeRepository, GenerationReport, PayrollFilter, PayrollRepository,
        UpdateAttendanceInput, UpdateEmployeeInput,
    },
};
use comptoir_shared::{
    AppError,
    types::{PageRequest, PageResponse},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson, nullable},
    middleware::AuthUser,
    validation::{hours, money, multiplier},
};

/// Creates the HR routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hr/employees", get(list_employees).post(create_employee))
        .route(
            "/hr/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/hr/attendance", get(list_attendance).post(record_attendance))
        .route(
            "/hr/attendance/{id}",
            put(update_attendance).delete(delete_attendance),
        )
        .route("/hr/payroll", get(list_payroll))
        .route("/hr/payroll/generate", post(generate_payroll))
        .route(
            "/hr/payroll/{id}",
            get(get_payroll).put(adjust_payroll).delete(delete_payroll),
        )
        .route("/hr/payroll/{id}/pay", post(pay_payroll))
}

// ============================================================================
// Employees
// ============================================================================

/// Query parameters for listing employees.
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    /// Matches names or code.
    pub search: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Active flag.
    pub active: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for hiring an employee.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    /// Unique staff code.
    #[validate(length(min = 1, max = 32, message = "employee code is required"))]
    pub employee_code: String,
    /// First name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Email.
    #[validate(email)]
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
    #[validate(custom(function = "money"))]
    pub base_salary: Decimal,
    /// Overtime multiplier for this employee only.
    #[validate(custom(function = "multiplier"))]
    pub overtime_multiplier: Option<Decimal>,
}

/// Request body for updating an employee; `null` clears optional fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    /// Staff code.
    #[validate(length(min = 1, max = 32))]
    pub employee_code: Option<String>,
    /// First name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    /// Last name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// Email.
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email)]
    pub email: Option<Option<String>>,
    /// Phone.
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    /// Job title.
    #[serde(default, deserialize_with = "nullable")]
    pub position: Option<Option<String>>,
    /// Department.
    #[serde(default, deserialize_with = "nullable")]
    pub department: Option<Option<String>>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
    /// Last day of employment.
    #[serde(default, deserialize_with = "nullable")]
    pub termination_date: Option<Option<NaiveDate>>,
    /// Monthly base salary.
    #[validate(custom(function = "money"))]
    pub base_salary: Option<Decimal>,
    /// Overtime multiplier override.
    #[serde(default, deserialize_with = "nullable")]
    pub overtime_multiplier: Option<Option<Decimal>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> ApiResult<Json<PageResponse<employees::Model>>> {
    let filter = EmployeeFilter {
        search: query.search,
        department: query.department,
        is_active: query.active,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        EmployeeRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<employees::Model>)> {
    let employee = EmployeeRepository::new(state.conn())
        .create(CreateEmployeeInput {
            employee_code: payload.employee_code,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            position: payload.position,
            department: payload.department,
            hire_date: payload.hire_date,
            base_salary: payload.base_salary,
            overtime_multiplier: payload.overtime_multiplier,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<employees::Model>> {
    EmployeeRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee", id))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEmployeeRequest>,
) -> ApiResult<Json<employees::Model>> {
    let employee = EmployeeRepository::new(state.conn())
        .update(
            id,
            UpdateEmployeeInput {
                employee_code: payload.employee_code,
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                phone: payload.phone,
                position: payload.position,
                department: payload.department,
                hire_date: payload.hire_date,
                termination_date: payload.termination_date,
                base_salary: payload.base_salary,
                overtime_multiplier: payload.overtime_multiplier,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(employee))
}

/// DELETE /hr/employees/{id} - Refused once payroll exists; deactivate
/// instead.
async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    EmployeeRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Attendance
// ============================================================================

/// Query parameters for listing attendance.
#[derive(Debug, Deserialize)]
pub struct ListAttendanceQuery {
    /// Employee.
    pub employee_id: Option<Uuid>,
    /// From (inclusive).
    pub from: Option<NaiveDate>,
    /// To (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for recording one day of attendance.
#[derive(Debug, Deserialize, Validate)]
pub struct AttendanceRequest {
    /// Employee.
    pub employee_id: Uuid,
    /// Day.
    pub date: NaiveDate,
    /// Presence status.
    pub status: AttendanceStatus,
    /// Hours worked beyond the standard day.
    #[serde(default)]
    #[validate(custom(function = "hours"))]
    pub overtime_hours: Decimal,
    /// Free text.
    pub notes: Option<String>,
}

/// Request body for correcting attendance.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAttendanceRequest {
    /// Presence status.
    pub status: Option<AttendanceStatus>,
    /// Overtime hours.
    #[validate(custom(function = "hours"))]
    pub overtime_hours: Option<Decimal>,
    /// Free text; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<ListAttendanceQuery>,
) -> ApiResult<Json<PageResponse<attendances::Model>>> {
    let filter = AttendanceFilter {
        employee_id: query.employee_id,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        AttendanceRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

/// POST /hr/attendance - 409 when the day is already recorded.
async fn record_attendance(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AttendanceRequest>,
) -> ApiResult<(StatusCode, Json<attendances::Model>)> {
    let attendance = AttendanceRepository::new(state.conn())
        .create(CreateAttendanceInput {
            employee_id: payload.employee_id,
            date: payload.date,
            status: payload.status,
            overtime_hours: payload.overtime_hours,
            notes: payload.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAttendanceRequest>,
) -> ApiResult<Json<attendances::Model>> {
    let attendance = AttendanceRepository::new(state.conn())
        .update(
            id,
            UpdateAttendanceInput {
                status: payload.status,
                overtime_hours: payload.overtime_hours,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(attendance))
}

async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    AttendanceRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Payroll
// ============================================================================

/// Query parameters for listing payroll rows.
#[derive(Debug, Deserialize)]
pub struct ListPayrollQuery {
    /// Period year.
    pub year: Option<i32>,
    /// Period month.
    pub month: Option<u32>,
    /// Employee.
    pub employee_id: Option<Uuid>,
    /// Status.
    pub status: Option<PayrollStatus>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for a generation run.
#[derive(Debug, Deserialize, Validate)]
pub struct GeneratePayrollRequest {
    /// Period year.
    #[validate(range(min = 2000, max = 9999))]
    pub year: i32,
    /// Period month, 1 to 12.
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: u32,
}

/// Request body for adjusting a draft payroll.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustPayrollRequest {
    /// Bonus added to gross.
    #[validate(custom(function = "money"))]
    pub bonus: Option<Decimal>,
    /// Deductions taken from gross.
    #[validate(custom(function = "money"))]
    pub deductions: Option<Decimal>,
}

async fn list_payroll(
    State(state): State<AppState>,
    Query(query): Query<ListPayrollQuery>,
) -> ApiResult<Json<PageResponse<payrolls::Model>>> {
    let filter = PayrollFilter {
        year: query.year,
        month: query.month,
        employee_id: query.employee_id,
        status: query.status,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        PayrollRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

/// POST /hr/payroll/generate - Draft payslips for the period (manager).
async fn generate_payroll(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<GeneratePayrollRequest>,
) -> ApiResult<(StatusCode, Json<GenerationReport>)> {
    auth.require_payroll_manager()?;
    let period = PayPeriod::new(payload.year, payload.month)
        .map_err(|e| ApiError(AppError::Validation(e.to_string())))?;

    let report = PayrollRepository::new(state.conn())
        .generate(&period, &state.payroll_policy)
        .await?;
    info!(
        period = %report.period,
        requested_by = %auth.user_id(),
        "payroll generation requested"
    );
    Ok((StatusCode::CREATED, Json(report)))
}

async fn get_payroll(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<payrolls::Model>> {
    PayrollRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Payroll", id))
}

/// PUT /hr/payroll/{id} - Change bonus or deductions of a draft.
async fn adjust_payroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdjustPayrollRequest>,
) -> ApiResult<Json<payrolls::Model>> {
    auth.require_payroll_manager()?;
    Ok(Json(
        PayrollRepository::new(state.conn())
            .adjust(id, payload.bonus, payload.deductions)
            .await?,
    ))
}

async fn delete_payroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_payroll_manager()?;
    PayrollRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pay_payroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<payrolls::Model>> {
    auth.require_payroll_manager()?;
    Ok(Json(PayrollRepository::new(state.conn()).pay(id).await?))
}
