//! Dashboard summary figures.
//!
//! The repository layer gathers the raw numbers; this module defines the
//! response shape, the small calculations shared by the queries and the
//! cache that keeps the summary for a few seconds.

pub mod cache;
pub mod types;

pub use cache::DashboardCache;
pub use types::*;
