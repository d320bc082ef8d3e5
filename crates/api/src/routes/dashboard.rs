//! Dashboard route.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use comptoir_core::dashboard::DashboardSummary;
use comptoir_db::DashboardRepository;

use crate::{AppState, error::ApiResult};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(summary))
}

/// GET /dashboard/summary - Served from cache while fresh.
async fn summary(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    if let Some(cached) = state.dashboard_cache.get() {
        return Ok(Json(DashboardSummary::clone(&cached)));
    }

    let summary = DashboardRepository::new(state.conn())
        .summary(Utc::now().date_naive())
        .await?;
    state.dashboard_cache.store(summary.clone());
    Ok(Json(summary))
}
