//! Request middleware.

pub mod auth;
pub mod dashboard;

pub use auth::{AuthUser, auth_middleware};
pub use dashboard::invalidate_dashboard;
