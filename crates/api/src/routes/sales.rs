//! Sales order and payment routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use comptoir_core::sales::SaleLine;
use comptoir_db::{
    entities::{
        sales,
        sea_orm_active_enums::{PaymentStatus, SaleStatus},
    },
    repositories::{SaleFilter, SaleInput, SaleRepository, SaleWithItems},
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson},
    middleware::AuthUser,
    validation::{money, percent, positive_money},
};

/// Creates the sales routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/{id}",
            get(get_sale).put(replace_sale).delete(delete_sale),
        )
        .route("/sales/{id}/confirm", post(confirm_sale))
        .route("/sales/{id}/cancel", post(cancel_sale))
        .route("/sales/{id}/payments", post(record_payment))
}

/// Query parameters for listing sales.
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// Document status.
    pub status: Option<SaleStatus>,
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Client.
    pub client_id: Option<Uuid>,
    /// Commercial credited with the sale.
    pub commercial_id: Option<Uuid>,
    /// Sale date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Sale date to (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating or replacing a draft sale.
#[derive(Debug, Deserialize, Validate)]
pub struct SaleRequest {
    /// Client; absent for a walk-in sale.
    pub client_id: Option<Uuid>,
    /// Commercial credited with the sale.
    pub commercial_id: Option<Uuid>,
    /// Sale date; today when absent.
    pub sale_date: Option<NaiveDate>,
    /// Discount on the whole order, as an amount.
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub discount_amount: Decimal,
    /// Tax rate in percent.
    #[serde(default)]
    #[validate(custom(function = "percent"))]
    pub tax_rate: Decimal,
    /// Free text.
    pub notes: Option<String>,
    /// Sold lines.
    #[validate(length(min = 1, message = "a sale needs at least one item"))]
    pub items: Vec<SaleLine>,
}

impl From<SaleRequest> for SaleInput {
    fn from(r: SaleRequest) -> Self {
        Self {
            client_id: r.client_id,
            commercial_id: r.commercial_id,
            sale_date: r.sale_date,
            discount_amount: r.discount_amount,
            tax_rate: r.tax_rate,
            notes: r.notes,
            items: r.items,
        }
    }
}

/// Request body for a payment.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentRequest {
    /// Amount received.
    #[validate(custom(function = "positive_money"))]
    pub amount: Decimal,
}

async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> ApiResult<Json<PageResponse<sales::Model>>> {
    let filter = SaleFilter {
        status: query.status,
        payment_status: query.payment_status,
        client_id: query.client_id,
        commercial_id: query.commercial_id,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        SaleRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleWithItems>)> {
    let sale = SaleRepository::new(state.conn())
        .create(payload.into(), Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SaleWithItems>> {
    SaleRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

async fn replace_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SaleRequest>,
) -> ApiResult<Json<SaleWithItems>> {
    Ok(Json(
        SaleRepository::new(state.conn())
            .replace(id, payload.into())
            .await?,
    ))
}

async fn delete_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    SaleRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sales/{id}/confirm - Issue the stock; 400 when any product is
/// short.
async fn confirm_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SaleWithItems>> {
    Ok(Json(
        SaleRepository::new(state.conn())
            .confirm(id, Some(auth.user_id()))
            .await?,
    ))
}

async fn cancel_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<sales::Model>> {
    Ok(Json(
        SaleRepository::new(state.conn())
            .cancel(id, Some(auth.user_id()))
            .await?,
    ))
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PaymentRequest>,
) -> ApiResult<Json<sales::Model>> {
    Ok(Json(
        SaleRepository::new(state.conn())
            .record_payment(id, payload.amount)
            .await?,
    ))
}
