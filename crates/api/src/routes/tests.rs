use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use comptoir_core::dashboard::{DashboardCache, DashboardSummary, InventorySummary, MonthRange};
use comptoir_core::hr::PayrollPolicy;
use comptoir_db::entities::products;
use comptoir_shared::{JwtConfig, JwtService};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".into(),
        ..JwtConfig::default()
    })
}

fn state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt()),
        payroll_policy: PayrollPolicy::default(),
        dashboard_cache: Arc::new(DashboardCache::new(60)),
        request_timeout: Duration::from_secs(5),
    }
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn app(db: DatabaseConnection) -> Router {
    create_router(state(db))
}

fn bearer(role: &str) -> String {
    let token = jwt().generate_access_token(Uuid::new_v4(), role).unwrap();
    format!("Bearer {token}")
}

async fn json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let response = app(empty_db())
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let response = app(empty_db())
        .oneshot(Request::get("/api/v1/products").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(response).await["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let refresh = jwt()
        .generate_refresh_token(Uuid::new_v4(), "admin")
        .unwrap();
    let response = app(empty_db())
        .oneshot(
            Request::get("/api/v1/products")
                .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_positive_expense_amount_is_rejected() {
    let body = serde_json::json!({
        "category": "rent",
        "description": "October rent",
        "amount": "0",
    });
    let response = app(empty_db())
        .oneshot(
            Request::post("/api/v1/expenses")
                .header(header::AUTHORIZATION, bearer("staff"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "VALIDATION_ERROR");
}

async fn post_json(path: &str, body: serde_json::Value) -> axum::response::Response {
    app(empty_db())
        .oneshot(
            Request::post(path)
                .header(header::AUTHORIZATION, bearer("staff"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_oversize_sale_figures_are_rejected_before_the_database() {
    for (quantity, unit_price) in [
        ("10000000000000000000000000000", "100"),
        ("999999999999999", "9999999999999999"),
        ("0.0004", "10"),
    ] {
        let body = serde_json::json!({
            "items": [{
                "product_id": Uuid::new_v4(),
                "quantity": quantity,
                "unit_price": unit_price,
            }],
        });
        let response = post_json("/api/v1/sales", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{quantity} x {unit_price}");
        assert_eq!(json(response).await["error"], "BUSINESS_RULE_VIOLATION");
    }
}

#[tokio::test]
async fn test_van_load_lines_are_validated() {
    let body = serde_json::json!({
        "commercial_id": Uuid::new_v4(),
        "items": [{
            "product_id": Uuid::new_v4(),
            "quantity": "1000000000000000",
        }],
    });
    let response = post_json("/api/v1/van-sales", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_sub_cent_expense_amount_is_rejected() {
    let body = serde_json::json!({
        "category": "transport",
        "description": "Fuel",
        "amount": "12.345",
    });
    let response = post_json("/api/v1/expenses", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_is_400_json() {
    let response = app(empty_db())
        .oneshot(
            Request::post("/api/v1/suppliers")
                .header(header::AUTHORIZATION, bearer("staff"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_staff_cannot_delete_bom() {
    let response = app(empty_db())
        .oneshot(
            Request::delete(format!("/api/v1/boms/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, bearer("staff"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<products::Model>::new()])
        .into_connection();
    let response = app(db)
        .oneshot(
            Request::get(format!("/api/v1/products/{}", Uuid::new_v4()))
                .header(header::AUTHORIZATION, bearer("staff"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_bad_path_id_is_400() {
    let response = app(empty_db())
        .oneshot(
            Request::get("/api/v1/products/not-a-uuid")
                .header(header::AUTHORIZATION, bearer("staff"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_served_from_cache() {
    let state = state(empty_db());
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    state.dashboard_cache.store(DashboardSummary {
        month: MonthRange::containing(today),
        inventory: InventorySummary::default(),
        sales_total: dec!(1200),
        expenses_total: dec!(300),
        net: dec!(900),
        open_purchase_orders: 1,
        vans_on_road: 0,
        generated_at: Utc::now(),
    });

    let response = create_router(state)
        .oneshot(
            Request::get("/api/v1/dashboard/summary")
                .header(header::AUTHORIZATION, bearer("staff"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["net"], "900");
}
