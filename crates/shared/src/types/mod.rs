//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{
    COST_SCALE, MONEY_SCALE, OutOfRange, QUANTITY_SCALE, checked_cost, checked_money,
    checked_quantity, ensure_fits, fits_column, round_money, round_quantity,
};
pub use pagination::{PageMeta, PageRequest, PageResponse};
