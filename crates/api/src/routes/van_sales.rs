//! Van sale routes: load a commercial's van, then reconcile what comes back.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use comptoir_core::van_sales::{Reconciliation, ReturnEntry};
use comptoir_db::{
    entities::{sea_orm_active_enums::VanSaleStatus, van_sales},
    repositories::{
        LoadVanInput, ReconcileVanInput, VanLoadLine, VanSaleFilter, VanSaleRepository,
        VanSaleWithItems,
    },
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson},
    middleware::AuthUser,
    validation::{money, positive_quantity},
};

/// Creates the van sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/van-sales", get(list_van_sales).post(load_van))
        .route("/van-sales/{id}", get(get_van_sale))
        .route("/van-sales/{id}/reconcile", post(reconcile_van_sale))
        .route("/van-sales/{id}/cancel", post(cancel_van_sale))
}

/// Query parameters for listing van sales.
#[derive(Debug, Deserialize)]
pub struct ListVanSalesQuery {
    /// Commercial.
    pub commercial_id: Option<Uuid>,
    /// Status.
    pub status: Option<VanSaleStatus>,
    /// Load date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Load date to (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// One product loaded onto the van.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct LoadLineRequest {
    /// Product.
    pub product_id: Uuid,
    /// Quantity loaded.
    #[validate(custom(function = "positive_quantity"))]
    pub quantity: Decimal,
    /// Price the commercial sells at; the product's sale price when absent.
    #[validate(custom(function = "money"))]
    pub unit_price: Option<Decimal>,
}

/// Request body for loading a van.
#[derive(Debug, Deserialize, Validate)]
pub struct LoadVanRequest {
    /// Commercial driving the van.
    pub commercial_id: Uuid,
    /// Load date; today when absent.
    pub load_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
    /// Loaded products.
    #[validate(length(min = 1, message = "a van load needs at least one item"), nested)]
    pub items: Vec<LoadLineRequest>,
}

/// Request body for reconciling a van sale.
#[derive(Debug, Deserialize, Validate)]
pub struct ReconcileRequest {
    /// Unsold quantities brought back; unlisted items sold out.
    #[serde(default)]
    pub returns: Vec<ReturnEntry>,
    /// Cash handed in by the commercial.
    #[validate(custom(function = "money"))]
    pub cash_collected: Decimal,
}

/// A reconciled van sale with the computed figures.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    /// Stored van sale.
    #[serde(flatten)]
    pub van_sale: VanSaleWithItems,
    /// Sold quantities, totals and cash discrepancy.
    pub reconciliation: Reconciliation,
}

async fn list_van_sales(
    State(state): State<AppState>,
    Query(query): Query<ListVanSalesQuery>,
) -> ApiResult<Json<PageResponse<van_sales::Model>>> {
    let filter = VanSaleFilter {
        commercial_id: query.commercial_id,
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        VanSaleRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

/// POST /van-sales - Load the van and take the goods out of stock.
async fn load_van(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<LoadVanRequest>,
) -> ApiResult<(StatusCode, Json<VanSaleWithItems>)> {
    let input = LoadVanInput {
        commercial_id: payload.commercial_id,
        load_date: payload.load_date,
        notes: payload.notes,
        items: payload
            .items
            .into_iter()
            .map(|l| VanLoadLine {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    };
    let van_sale = VanSaleRepository::new(state.conn())
        .load(input, Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(van_sale)))
}

async fn get_van_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VanSaleWithItems>> {
    VanSaleRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Van sale", id))
}

async fn reconcile_van_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ReconcileRequest>,
) -> ApiResult<Json<ReconcileResponse>> {
    let (van_sale, reconciliation) = VanSaleRepository::new(state.conn())
        .reconcile(
            id,
            ReconcileVanInput {
                returns: payload.returns,
                cash_collected: payload.cash_collected,
            },
            Some(auth.user_id()),
        )
        .await?;
    Ok(Json(ReconcileResponse {
        van_sale,
        reconciliation,
    }))
}

async fn cancel_van_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<van_sales::Model>> {
    Ok(Json(
        VanSaleRepository::new(state.conn())
            .cancel(id, Some(auth.user_id()))
            .await?,
    ))
}
