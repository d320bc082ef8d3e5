//! Product catalogue and stock routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use comptoir_db::{
    entities::{products, sea_orm_active_enums::ProductKind, stock_movements},
    repositories::{
        AdjustStockInput, CreateProductInput, ProductFilter, ProductRepository, UpdateProductInput,
    },
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PageQuery;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson, nullable},
    middleware::AuthUser,
    validation::{cost, money, quantity, stock_delta},
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/adjust", post(adjust_stock))
        .route("/products/{id}/movements", get(list_movements))
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Matches SKU or name.
    pub search: Option<String>,
    /// Product kind.
    pub kind: Option<ProductKind>,
    /// Active flag.
    pub active: Option<bool>,
    /// Only products at or below their reorder level.
    #[serde(default)]
    pub low_stock: bool,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Stock keeping unit, unique.
    #[validate(length(min = 1, max = 64, message = "SKU must be 1 to 64 characters"))]
    pub sku: String,
    /// Product name.
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    /// Free text.
    pub description: Option<String>,
    /// Product kind.
    pub kind: ProductKind,
    /// Unit of measure.
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    /// Default selling price.
    #[validate(custom(function = "money"))]
    pub sale_price: Decimal,
    /// Opening unit cost.
    #[serde(default)]
    #[validate(custom(function = "cost"))]
    pub unit_cost: Decimal,
    /// Low-stock threshold.
    #[serde(default)]
    #[validate(custom(function = "quantity"))]
    pub reorder_level: Decimal,
}

fn default_unit() -> String {
    "unit".to_string()
}

/// Request body for updating a product. Stock and cost only change through
/// movements.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// Stock keeping unit.
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    /// Product name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Free text; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// Product kind.
    pub kind: Option<ProductKind>,
    /// Unit of measure.
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    /// Default selling price.
    #[validate(custom(function = "money"))]
    pub sale_price: Option<Decimal>,
    /// Low-stock threshold.
    #[validate(custom(function = "quantity"))]
    pub reorder_level: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Request body for a manual stock adjustment.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockRequest {
    /// Signed change in quantity on hand.
    #[validate(custom(function = "stock_delta"))]
    pub delta: Decimal,
    /// Why the stock was corrected.
    #[validate(length(min = 1, max = 500, message = "a reason is required"))]
    pub reason: String,
}

/// Result of a stock adjustment.
#[derive(Debug, Serialize)]
pub struct AdjustStockResponse {
    /// Product after the adjustment.
    pub product: products::Model,
    /// Movement recorded.
    pub movement: stock_movements::Model,
}

/// GET /products
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<PageResponse<products::Model>>> {
    let filter = ProductFilter {
        search: query.search,
        kind: query.kind,
        is_active: query.active,
        low_stock: query.low_stock,
    };
    let page = PageRequest::new(query.page, query.per_page);
    let products = ProductRepository::new(state.conn()).list(&filter, &page).await?;
    Ok(Json(products))
}

/// POST /products
async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<products::Model>)> {
    let product = ProductRepository::new(state.conn())
        .create(CreateProductInput {
            sku: payload.sku,
            name: payload.name,
            description: payload.description,
            kind: payload.kind,
            unit: payload.unit,
            sale_price: payload.sale_price,
            unit_cost: payload.unit_cost,
            reorder_level: payload.reorder_level,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<products::Model>> {
    ProductRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// PUT /products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<Json<products::Model>> {
    let product = ProductRepository::new(state.conn())
        .update(
            id,
            UpdateProductInput {
                sku: payload.sku,
                name: payload.name,
                description: payload.description,
                kind: payload.kind,
                unit: payload.unit,
                sale_price: payload.sale_price,
                reorder_level: payload.reorder_level,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(product))
}

/// DELETE /products/{id} - Refused once the product has history.
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    ProductRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /products/{id}/adjust
async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdjustStockRequest>,
) -> ApiResult<Json<AdjustStockResponse>> {
    let (product, movement) = ProductRepository::new(state.conn())
        .adjust_stock(
            id,
            AdjustStockInput {
                delta: payload.delta,
                reason: payload.reason,
            },
            Some(auth.user_id()),
        )
        .await?;
    Ok(Json(AdjustStockResponse { product, movement }))
}

/// GET /products/{id}/movements
async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PageResponse<stock_movements::Model>>> {
    let movements = ProductRepository::new(state.conn())
        .movements(id, &query.page_request())
        .await?;
    Ok(Json(movements))
}
