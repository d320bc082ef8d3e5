//! Keeps the cached dashboard summary honest.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Drops the cached dashboard summary after any successful write.
pub async fn invalidate_dashboard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let writes = !matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    let response = next.run(request).await;
    if writes && response.status().is_success() {
        state.dashboard_cache.invalidate();
    }
    response
}
