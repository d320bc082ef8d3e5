//! Purchase order routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use comptoir_core::purchasing::{PurchaseLine, ReceiptOverride};
use comptoir_db::{
    entities::{purchases, sea_orm_active_enums::PurchaseStatus},
    repositories::{PurchaseFilter, PurchaseInput, PurchaseRepository, PurchaseWithItems},
};
use comptoir_shared::types::{PageRequest, PageResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson},
    middleware::AuthUser,
};

/// Creates the purchase order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route(
            "/purchases/{id}",
            get(get_purchase).put(replace_purchase).delete(delete_purchase),
        )
        .route("/purchases/{id}/confirm", post(confirm_purchase))
        .route("/purchases/{id}/receive", post(receive_purchase))
        .route("/purchases/{id}/cancel", post(cancel_purchase))
}

/// Query parameters for listing purchase orders.
#[derive(Debug, Deserialize)]
pub struct ListPurchasesQuery {
    /// Status.
    pub status: Option<PurchaseStatus>,
    /// Supplier.
    pub supplier_id: Option<Uuid>,
    /// Order date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Order date to (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating or replacing a draft purchase order.
#[derive(Debug, Deserialize, Validate)]
pub struct PurchaseRequest {
    /// Supplier ordered from.
    pub supplier_id: Uuid,
    /// Order date; today when absent.
    pub order_date: Option<NaiveDate>,
    /// Expected delivery.
    pub expected_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
    /// Ordered lines.
    #[validate(length(min = 1, message = "a purchase order needs at least one item"))]
    pub items: Vec<PurchaseLine>,
}

impl From<PurchaseRequest> for PurchaseInput {
    fn from(r: PurchaseRequest) -> Self {
        Self {
            supplier_id: r.supplier_id,
            order_date: r.order_date,
            expected_date: r.expected_date,
            notes: r.notes,
            items: r.items,
        }
    }
}

/// Optional body of a receipt: corrections of the expected quantities.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReceiveRequest {
    /// Per-item received quantities; items not listed arrive in full.
    #[serde(default)]
    pub items: Vec<ReceiptOverride>,
}

async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<ListPurchasesQuery>,
) -> ApiResult<Json<PageResponse<purchases::Model>>> {
    let filter = PurchaseFilter {
        status: query.status,
        supplier_id: query.supplier_id,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        PurchaseRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<PurchaseRequest>,
) -> ApiResult<(StatusCode, Json<PurchaseWithItems>)> {
    let purchase = PurchaseRepository::new(state.conn())
        .create(payload.into(), Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PurchaseWithItems>> {
    PurchaseRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Purchase order", id))
}

/// PUT /purchases/{id} - Replace header and items of a draft.
async fn replace_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PurchaseRequest>,
) -> ApiResult<Json<PurchaseWithItems>> {
    Ok(Json(
        PurchaseRepository::new(state.conn())
            .replace(id, payload.into())
            .await?,
    ))
}

async fn delete_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    PurchaseRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn confirm_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PurchaseWithItems>> {
    Ok(Json(PurchaseRepository::new(state.conn()).confirm(id).await?))
}

/// POST /purchases/{id}/receive - Book the goods into stock at their
/// purchase cost.
async fn receive_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<ValidatedJson<ReceiveRequest>>,
) -> ApiResult<Json<PurchaseWithItems>> {
    let overrides = body.map(|ValidatedJson(b)| b.items).unwrap_or_default();
    Ok(Json(
        PurchaseRepository::new(state.conn())
            .receive(id, &overrides, Some(auth.user_id()))
            .await?,
    ))
}

async fn cancel_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<purchases::Model>> {
    Ok(Json(PurchaseRepository::new(state.conn()).cancel(id).await?))
}
