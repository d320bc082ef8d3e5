//! Dashboard figures, read straight from the tables.

use chrono::NaiveDate;
use comptoir_core::dashboard::{DashboardSummary, InventorySummary, MonthRange, stock_value};
use comptoir_core::inventory::{StockPosition, is_low_stock};
use comptoir_shared::types::round_money;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use crate::entities::{
    expenses, products, purchases, sales,
    sea_orm_active_enums::{PurchaseStatus, SaleStatus, VanSaleStatus},
    van_sales,
};

/// Read-only repository behind `GET /dashboard/summary`.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the summary for the month containing `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn summary(&self, today: NaiveDate) -> Result<DashboardSummary, DbErr> {
        let month = MonthRange::containing(today);
        let inventory = self.inventory().await?;

        let sales_total: Decimal = sales::Entity::find()
            .select_only()
            .column(sales::Column::TotalAmount)
            .filter(sales::Column::Status.eq(SaleStatus::Confirmed))
            .filter(sales::Column::SaleDate.between(month.from, month.to))
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let expenses_total: Decimal = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Amount)
            .filter(expenses::Column::ExpenseDate.between(month.from, month.to))
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let open_purchase_orders = purchases::Entity::find()
            .filter(
                purchases::Column::Status.is_in([PurchaseStatus::Draft, PurchaseStatus::Confirmed]),
            )
            .count(&self.db)
            .await?;

        let vans_on_road = van_sales::Entity::find()
            .filter(van_sales::Column::Status.eq(VanSaleStatus::Loaded))
            .count(&self.db)
            .await?;

        Ok(DashboardSummary {
            month,
            inventory,
            sales_total: round_money(sales_total),
            expenses_total: round_money(expenses_total),
            net: round_money(sales_total - expenses_total),
            open_purchase_orders,
            vans_on_road,
            generated_at: chrono::Utc::now(),
        })
    }

    async fn inventory(&self) -> Result<InventorySummary, DbErr> {
        let rows: Vec<(Decimal, Decimal, Decimal)> = products::Entity::find()
            .select_only()
            .column(products::Column::Quantity)
            .column(products::Column::UnitCost)
            .column(products::Column::ReorderLevel)
            .filter(products::Column::IsActive.eq(true))
            .into_tuple()
            .all(&self.db)
            .await?;

        let positions: Vec<StockPosition> = rows
            .iter()
            .map(|(quantity, cost, _)| StockPosition::new(*quantity, *cost))
            .collect();
        let low_stock_count = rows
            .iter()
            .filter(|(quantity, _, reorder)| is_low_stock(*quantity, *reorder))
            .count();

        Ok(InventorySummary {
            product_count: positions.len() as u64,
            low_stock_count: low_stock_count as u64,
            stock_value: stock_value(&positions),
        })
    }
}
