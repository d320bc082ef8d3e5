//! Bill of materials and production order routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use comptoir_core::manufacturing::BomComponent;
use comptoir_db::{
    entities::{bills_of_materials, production_orders, sea_orm_active_enums::ProductionStatus},
    repositories::{
        BomCost, BomFilter, BomInput, BomRepository, BomWithComponents, CreateProductionInput,
        ProductionFilter, ProductionOrderRepository,
    },
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
    validation::positive_quantity,
};

/// Creates the manufacturing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boms", get(list_boms).post(create_bom))
        .route(
            "/boms/{id}",
            get(get_bom).put(update_bom).delete(delete_bom),
        )
        .route("/boms/{id}/cost", get(bom_cost))
        .route(
            "/production-orders",
            get(list_production_orders).post(create_production_order),
        )
        .route(
            "/production-orders/{id}",
            get(get_production_order).delete(delete_production_order),
        )
        .route("/production-orders/{id}/start", post(start_production))
        .route("/production-orders/{id}/complete", post(complete_production))
        .route("/production-orders/{id}/cancel", post(cancel_production))
}

// ============================================================================
// Bills of materials
// ============================================================================

/// Query parameters for listing BOMs.
#[derive(Debug, Deserialize)]
pub struct ListBomsQuery {
    /// Finished product.
    pub product_id: Option<Uuid>,
    /// Active flag.
    pub active: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating or replacing a BOM.
#[derive(Debug, Deserialize, Validate)]
pub struct BomRequest {
    /// Finished product.
    pub product_id: Uuid,
    /// Recipe name.
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    /// Units produced by one batch.
    #[validate(custom(function = "positive_quantity"))]
    pub output_quantity: Decimal,
    /// Free text.
    pub notes: Option<String>,
    /// Active flag.
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    /// Components per batch.
    #[validate(length(min = 1, message = "a BOM needs at least one component"))]
    pub components: Vec<BomComponent>,
}

const fn active_by_default() -> bool {
    true
}

impl From<BomRequest> for BomInput {
    fn from(r: BomRequest) -> Self {
        Self {
            product_id: r.product_id,
            name: r.name,
            output_quantity: r.output_quantity,
            notes: r.notes,
            is_active: r.is_active,
            components: r.components,
        }
    }
}

async fn list_boms(
    State(state): State<AppState>,
    Query(query): Query<ListBomsQuery>,
) -> ApiResult<Json<PageResponse<bills_of_materials::Model>>> {
    let filter = BomFilter {
        product_id: query.product_id,
        is_active: query.active,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        BomRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_bom(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BomRequest>,
) -> ApiResult<(StatusCode, Json<BomWithComponents>)> {
    let bom = BomRepository::new(state.conn())
        .create(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(bom)))
}

async fn get_bom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BomWithComponents>> {
    BomRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("BOM", id))
}

async fn update_bom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BomRequest>,
) -> ApiResult<Json<BomWithComponents>> {
    Ok(Json(
        BomRepository::new(state.conn())
            .update(id, payload.into())
            .await?,
    ))
}

/// DELETE /boms/{id} - 400 while a production order uses the BOM.
async fn delete_bom(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    BomRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bom_cost(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<BomCost>> {
    Ok(Json(BomRepository::new(state.conn()).cost(id).await?))
}

// ============================================================================
// Production orders
// ============================================================================

/// Query parameters for listing production orders.
#[derive(Debug, Deserialize)]
pub struct ListProductionQuery {
    /// Status.
    pub status: Option<ProductionStatus>,
    /// Finished product.
    pub product_id: Option<Uuid>,
    /// Planned from (inclusive).
    pub from: Option<NaiveDate>,
    /// Planned to (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for planning a production order.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductionRequest {
    /// Recipe to follow.
    pub bom_id: Uuid,
    /// Units of finished product.
    #[validate(custom(function = "positive_quantity"))]
    pub quantity: Decimal,
    /// Planned date; today when absent.
    pub planned_date: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
}

async fn list_production_orders(
    State(state): State<AppState>,
    Query(query): Query<ListProductionQuery>,
) -> ApiResult<Json<PageResponse<production_orders::Model>>> {
    let filter = ProductionFilter {
        status: query.status,
        product_id: query.product_id,
        from: query.from,
        to: query.to,
    };
    let page = PageRequest::new(query.page, query.per_page);
    Ok(Json(
        ProductionOrderRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_production_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateProductionRequest>,
) -> ApiResult<(StatusCode, Json<production_orders::Model>)> {
    let order = ProductionOrderRepository::new(state.conn())
        .create(
            CreateProductionInput {
                bom_id: payload.bom_id,
                quantity: payload.quantity,
                planned_date: payload.planned_date,
                notes: payload.notes,
            },
            Some(auth.user_id()),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_production_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<production_orders::Model>> {
    ProductionOrderRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Production order", id))
}

async fn delete_production_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    ProductionOrderRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<production_orders::Model>> {
    Ok(Json(
        ProductionOrderRepository::new(state.conn())
            .start(id)
            .await?,
    ))
}

/// POST /production-orders/{id}/complete - Consume the components and
/// receive the finished goods at their material cost.
async fn complete_production(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<production_orders::Model>> {
    Ok(Json(
        ProductionOrderRepository::new(state.conn())
            .complete(id, Some(auth.user_id()))
            .await?,
    ))
}

async fn cancel_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<production_orders::Model>> {
    Ok(Json(
        ProductionOrderRepository::new(state.conn())
            .cancel(id)
            .await?,
    ))
}
