//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication and role checks
//! - Request extractors with validation
//! - Error to HTTP response mapping

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode};
use comptoir_core::dashboard::DashboardCache;
use comptoir_core::hr::PayrollPolicy;
use comptoir_shared::JwtService;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Payroll policy used when generating payslips.
    pub payroll_policy: PayrollPolicy,
    /// Cached dashboard summary.
    pub dashboard_cache: Arc<DashboardCache>,
    /// Upper bound on the time spent serving one request.
    pub request_timeout: Duration,
}

impl AppState {
    /// A handle on the pool for constructing repositories.
    #[must_use]
    pub fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
