//! Expense routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::NaiveDate;
use comptoir_core::expenses::ExpenseSummary;
use comptoir_db::{
    entities::{
        expenses,
        sea_orm_active_enums::{ExpenseCategory, PaymentMethod},
    },
    repositories::{CreateExpenseInput, ExpenseFilter, ExpenseRepository, UpdateExpenseInput},
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson, nullable},
    middleware::AuthUser,
    validation::positive_money,
};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/summary", get(expense_summary))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Category.
    pub category: Option<ExpenseCategory>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// From (inclusive).
    pub from: Option<NaiveDate>,
    /// To (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Date range of the summary; open ends are unbounded.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// From (inclusive).
    pub from: Option<NaiveDate>,
    /// To (inclusive).
    pub to: Option<NaiveDate>,
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Category.
    pub category: ExpenseCategory,
    /// What was paid for.
    #[validate(length(min = 1, max = 500, message = "description is required"))]
    pub description: String,
    /// Amount paid.
    #[validate(custom(function = "positive_money"))]
    pub amount: Decimal,
    /// Date; today when absent.
    pub expense_date: Option<NaiveDate>,
    /// How it was paid.
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    /// Supplier paid, if any.
    pub supplier_id: Option<Uuid>,
    /// Receipt or invoice number.
    pub receipt_number: Option<String>,
}

const fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Cash
}

/// Request body for correcting an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    /// Category.
    pub category: Option<ExpenseCategory>,
    /// Description.
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    /// Amount.
    #[validate(custom(function = "positive_money"))]
    pub amount: Option<Decimal>,
    /// Date.
    pub expense_date: Option<NaiveDate>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Supplier; `null` unlinks it.
    #[serde(default, deserialize_with = "nullable")]
    pub supplier_id: Option<Option<Uuid>>,
    /// Receipt number; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub receipt_number: Option<Option<String>>,
}

async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
) -> ApiResult<Json<PageResponse<expenses::Model>>> {
    let filter = ExpenseFilter {
        category: query.category,
        payment_method: query.payment_method,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        ExpenseRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<expenses::Model>)> {
    let expense = ExpenseRepository::new(state.conn())
        .create(
            CreateExpenseInput {
                category: payload.category,
                description: payload.description,
                amount: payload.amount,
                expense_date: payload.expense_date,
                payment_method: payload.payment_method,
                supplier_id: payload.supplier_id,
                receipt_number: payload.receipt_number,
            },
            Some(auth.user_id()),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<expenses::Model>> {
    ExpenseRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense", id))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateExpenseRequest>,
) -> ApiResult<Json<expenses::Model>> {
    let expense = ExpenseRepository::new(state.conn())
        .update(
            id,
            UpdateExpenseInput {
                category: payload.category,
                description: payload.description,
                amount: payload.amount,
                expense_date: payload.expense_date,
                payment_method: payload.payment_method,
                supplier_id: payload.supplier_id,
                receipt_number: payload.receipt_number,
            },
        )
        .await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    ExpenseRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /expenses/summary - Totals per category.
async fn expense_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<ExpenseSummary>> {
    Ok(Json(
        ExpenseRepository::new(state.conn())
            .summary(query.from, query.to)
            .await?,
    ))
}
