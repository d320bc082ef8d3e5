//! API route definitions.

use axum::{Router, middleware};
use comptoir_shared::types::PageRequest;
use serde::Deserialize;

use crate::{
    AppState,
    middleware::{auth_middleware, invalidate_dashboard},
};

pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod hr;
pub mod manufacturing;
pub mod partners;
pub mod products;
pub mod purchases;
pub mod sales;
pub mod van_sales;

/// Bare pagination query for lists without filters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number, from 1.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// The clamped page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Creates the API router: public health and auth routes, everything else
/// behind the bearer-token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(products::routes())
        .merge(partners::routes())
        .merge(purchases::routes())
        .merge(sales::routes())
        .merge(van_sales::routes())
        .merge(hr::routes())
        .merge(expenses::routes())
        .merge(manufacturing::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            invalidate_dashboard,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

#[cfg(test)]
mod tests;
