//! Dashboard data types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use comptoir_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inventory::StockPosition;

/// Dashboard summary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Month the sales and expense figures cover.
    pub month: MonthRange,
    /// Inventory figures.
    pub inventory: InventorySummary,
    /// Confirmed sales in the month.
    pub sales_total: Decimal,
    /// Expenses in the month.
    pub expenses_total: Decimal,
    /// Sales minus expenses.
    pub net: Decimal,
    /// Purchase orders still expected (draft or confirmed).
    pub open_purchase_orders: u64,
    /// Van sales loaded and not yet reconciled.
    pub vans_on_road: u64,
    /// When the figures were computed.
    pub generated_at: DateTime<Utc>,
}

/// Stock figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Active products.
    pub product_count: u64,
    /// Products at or below their reorder level.
    pub low_stock_count: u64,
    /// Σ on hand · unit cost.
    pub stock_value: Decimal,
}

/// First and last day of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    /// First day.
    pub from: NaiveDate,
    /// Last day.
    pub to: NaiveDate,
}

impl MonthRange {
    /// Month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let from = date.with_day(1).unwrap_or(date);
        let to = from
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { from, to }
    }
}

/// Total value of a set of stock positions, rounded to cents.
#[must_use]
pub fn stock_value<'a>(positions: impl IntoIterator<Item = &'a StockPosition>) -> Decimal {
    round_money(
        positions
            .into_iter()
            .map(StockPosition::value)
            .fold(Decimal::ZERO, Decimal::saturating_add),
    )
}
