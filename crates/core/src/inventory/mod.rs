//! Products, stock positions and stock movements.
//!
//! Stock on hand is never allowed to go negative: every outbound movement
//! goes through [`StockPosition::issue`], which refuses to overdraw.

pub mod costing;
pub mod error;
pub mod stock;
pub mod types;

#[cfg(test)]
mod props;

pub use costing::{StockPosition, weighted_average_cost};
pub use error::InventoryError;
pub use stock::{StockRequirement, aggregate_requirements, check_availability, is_low_stock};
pub use types::{MovementDirection, MovementType, ProductKind};
