//! Van sales repository: loading, reconciliation and cancellation.

use chrono::NaiveDate;
use comptoir_core::inventory::StockRequirement;
use comptoir_core::van_sales::{
    self as van_rules, LoadedLine, Reconciliation, ReturnEntry, VanSaleError,
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation, next_reference};
use super::stock::{MovementSource, StockWriter, position_of};
use crate::entities::{
    commercials,
    sea_orm_active_enums::{MovementType, VanSaleStatus},
    van_sale_items, van_sales,
};

const REFERENCE_PREFIX: &str = "VAN";
const REFERENCE_TYPE: &str = "van_sale";

/// Error types for van sale persistence.
#[derive(Debug, thiserror::Error)]
pub enum VanSaleRepoError {
    /// Van sale not found.
    #[error("Van sale not found: {0}")]
    NotFound(Uuid),

    /// Commercial not found.
    #[error("Commercial not found: {0}")]
    CommercialNotFound(Uuid),

    /// Commercial is deactivated.
    #[error("Commercial {0} is not active")]
    CommercialInactive(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Another van sale took the same reference concurrently.
    #[error("Van sale reference '{0}' already exists")]
    DuplicateReference(String),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] VanSaleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One product to load.
#[derive(Debug, Clone, Copy)]
pub struct VanLoadLine {
    /// Product.
    pub product_id: Uuid,
    /// Quantity put on the van.
    pub quantity: Decimal,
    /// Field price; defaults to the product's sale price.
    pub unit_price: Option<Decimal>,
}

/// Input for loading a van.
#[derive(Debug, Clone)]
pub struct LoadVanInput {
    /// Commercial driving the van.
    pub commercial_id: Uuid,
    /// Load date; defaults to today.
    pub load_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
    /// Loaded products.
    pub items: Vec<VanLoadLine>,
}

/// Input for reconciling a van.
#[derive(Debug, Clone)]
pub struct ReconcileVanInput {
    /// Unsold quantities; items not listed are fully sold.
    pub returns: Vec<ReturnEntry>,
    /// Cash handed in.
    pub cash_collected: Decimal,
}

/// Filter options for listing van sales.
#[derive(Debug, Clone, Default)]
pub struct VanSaleFilter {
    /// Commercial.
    pub commercial_id: Option<Uuid>,
    /// Status.
    pub status: Option<VanSaleStatus>,
    /// Load date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Load date to (inclusive).
    pub to: Option<NaiveDate>,
}

/// Van sale with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct VanSaleWithItems {
    /// Header.
    #[serde(flatten)]
    pub van_sale: van_sales::Model,
    /// Lines.
    pub items: Vec<van_sale_items::Model>,
}

/// Van sales repository.
#[derive(Debug, Clone)]
pub struct VanSaleRepository {
    db: DatabaseConnection,
}

impl VanSaleRepository {
    /// Creates a new van sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads a van in one transaction: checks stock, issues every line with
    /// a `van_load` movement and stores the van sale.
    ///
    /// # Errors
    ///
    /// Returns `CommercialNotFound`/`CommercialInactive`, `ProductNotFound`,
    /// or `Rule` for invalid lines and insufficient stock.
    pub async fn load(
        &self,
        input: LoadVanInput,
        user_id: Option<Uuid>,
    ) -> Result<VanSaleWithItems, VanSaleRepoError> {
        let commercial = commercials::Entity::find_by_id(input.commercial_id)
            .one(&self.db)
            .await?
            .ok_or(VanSaleRepoError::CommercialNotFound(input.commercial_id))?;
        if !commercial.is_active {
            return Err(VanSaleRepoError::CommercialInactive(commercial.id));
        }

        let txn = self.db.begin().await?;
        let mut products =
            StockWriter::lock_products(&txn, input.items.iter().map(|l| l.product_id)).await?;

        let mut lines = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = products
                .get(&item.product_id)
                .ok_or(VanSaleRepoError::ProductNotFound(item.product_id))?;
            lines.push(LoadedLine {
                item_id: Uuid::new_v4(),
                product_id: item.product_id,
                loaded: item.quantity,
                unit_price: item.unit_price.unwrap_or(product.sale_price),
            });
        }
        van_rules::validate_load(&lines)?;
        StockWriter::check_available(
            &products,
            lines
                .iter()
                .map(|l| StockRequirement::new(l.product_id, l.loaded)),
        )
        .map_err(VanSaleError::from)?;

        let load_date = input
            .load_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let reference = next_reference::<van_sales::Entity, _>(
            &txn,
            van_sales::Column::Reference,
            REFERENCE_PREFIX,
            load_date,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let van_sale = van_sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(reference.clone()),
            commercial_id: Set(commercial.id),
            status: Set(VanSaleStatus::Loaded),
            load_date: Set(load_date),
            total_amount: Set(Decimal::ZERO),
            cash_collected: Set(None),
            discrepancy: Set(None),
            notes: Set(input.notes),
            created_by: Set(user_id),
            reconciled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VanSaleRepoError::DuplicateReference(reference)
            } else {
                VanSaleRepoError::Database(e)
            }
        })?;

        let source =
            MovementSource::document(MovementType::VanLoad, REFERENCE_TYPE, van_sale.id, user_id);
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = products
                .remove(&line.product_id)
                .ok_or(VanSaleRepoError::ProductNotFound(line.product_id))?;
            let position = position_of(&product);
            let after = position.issue(line.loaded).map_err(VanSaleError::from)?;
            let (product, _) =
                StockWriter::apply(&txn, product, after, position.unit_cost, &source).await?;
            products.insert(product.id, product);

            let item = van_sale_items::ActiveModel {
                id: Set(line.item_id),
                van_sale_id: Set(van_sale.id),
                product_id: Set(line.product_id),
                loaded_quantity: Set(line.loaded),
                sold_quantity: Set(Decimal::ZERO),
                returned_quantity: Set(Decimal::ZERO),
                unit_price: Set(line.unit_price),
                line_total: Set(Decimal::ZERO),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;
        tracing::info!(
            van_sale_id = %van_sale.id,
            commercial_id = %commercial.id,
            lines = items.len(),
            "van loaded"
        );
        Ok(VanSaleWithItems { van_sale, items })
    }

    /// Finds a van sale with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VanSaleWithItems>, DbErr> {
        let Some(van_sale) = van_sales::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = load_items(&self.db, id).await?;
        Ok(Some(VanSaleWithItems { van_sale, items }))
    }

    /// Lists van sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &VanSaleFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<van_sales::Model>, DbErr> {
        let mut query = van_sales::Entity::find();
        if let Some(commercial_id) = filter.commercial_id {
            query = query.filter(van_sales::Column::CommercialId.eq(commercial_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(van_sales::Column::Status.eq(status));
        }
        if let Some(from) = filter.from {
            query = query.filter(van_sales::Column::LoadDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(van_sales::Column::LoadDate.lte(to));
        }
        let query = query
            .order_by_desc(van_sales::Column::LoadDate)
            .order_by_desc(van_sales::Column::CreatedAt);
        fetch_page(&self.db, query, page).await
    }

    /// Reconciles a loaded van in one transaction: returned quantities go
    /// back to stock (`van_return`), sold and returned quantities, totals,
    /// cash and discrepancy are stored, and the van sale is closed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for a van that is not loaded or an
    /// invalid return.
    pub async fn reconcile(
        &self,
        id: Uuid,
        input: ReconcileVanInput,
        user_id: Option<Uuid>,
    ) -> Result<(VanSaleWithItems, Reconciliation), VanSaleRepoError> {
        let txn = self.db.begin().await?;
        let van_sale = lock_van_sale(&txn, id).await?;
        let items = load_items(&txn, id).await?;

        let lines: Vec<LoadedLine> = items.iter().map(loaded_line).collect();
        let outcome = van_rules::reconcile(
            van_sale.status.into(),
            &lines,
            &input.returns,
            input.cash_collected,
        )?;

        let mut products = StockWriter::lock_products(
            &txn,
            outcome
                .lines
                .iter()
                .filter(|l| l.returned > Decimal::ZERO)
                .map(|l| l.product_id),
        )
        .await?;
        let source = MovementSource::document(MovementType::VanReturn, REFERENCE_TYPE, id, user_id);

        for (item, line) in items.into_iter().zip(&outcome.lines) {
            if line.returned > Decimal::ZERO {
                let product = products
                    .remove(&line.product_id)
                    .ok_or(VanSaleRepoError::ProductNotFound(line.product_id))?;
                let position = position_of(&product);
                let after = position
                    .restock(line.returned)
                    .map_err(VanSaleError::from)?;
                let (product, _) =
                    StockWriter::apply(&txn, product, after, position.unit_cost, &source).await?;
                products.insert(product.id, product);
            }

            let mut active: van_sale_items::ActiveModel = item.into();
            active.sold_quantity = Set(line.sold);
            active.returned_quantity = Set(line.returned);
            active.line_total = Set(line.line_total);
            active.update(&txn).await?;
        }

        let now = chrono::Utc::now().into();
        let mut active: van_sales::ActiveModel = van_sale.into();
        active.status = Set(VanSaleStatus::Reconciled);
        active.total_amount = Set(outcome.total);
        active.cash_collected = Set(Some(outcome.cash_collected));
        active.discrepancy = Set(Some(outcome.discrepancy));
        active.reconciled_at = Set(Some(now));
        active.updated_at = Set(now);
        let van_sale = active.update(&txn).await?;

        let items = load_items(&txn, id).await?;
        txn.commit().await?;

        if outcome.discrepancy.is_zero() {
            tracing::info!(van_sale_id = %id, total = %outcome.total, "van reconciled");
        } else {
            tracing::warn!(
                van_sale_id = %id,
                total = %outcome.total,
                discrepancy = %outcome.discrepancy,
                "van reconciled with cash discrepancy"
            );
        }
        Ok((VanSaleWithItems { van_sale, items }, outcome))
    }

    /// Cancels a loaded van: every loaded quantity returns to stock.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` once the van is reconciled or cancelled.
    pub async fn cancel(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<van_sales::Model, VanSaleRepoError> {
        let txn = self.db.begin().await?;
        let van_sale = lock_van_sale(&txn, id).await?;
        let next = van_rules::cancel(van_sale.status.into())?;

        let items = load_items(&txn, id).await?;
        let mut products =
            StockWriter::lock_products(&txn, items.iter().map(|i| i.product_id)).await?;
        let source = MovementSource::document(MovementType::VanReturn, REFERENCE_TYPE, id, user_id);
        for item in &items {
            let product = products
                .remove(&item.product_id)
                .ok_or(VanSaleRepoError::ProductNotFound(item.product_id))?;
            let position = position_of(&product);
            let after = position
                .restock(item.loaded_quantity)
                .map_err(VanSaleError::from)?;
            let (product, _) =
                StockWriter::apply(&txn, product, after, position.unit_cost, &source).await?;
            products.insert(product.id, product);
        }

        let mut active: van_sales::ActiveModel = van_sale.into();
        active.status = Set(next.into());
        active.updated_at = Set(chrono::Utc::now().into());
        let van_sale = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(van_sale_id = %id, "van sale cancelled");
        Ok(van_sale)
    }
}

fn loaded_line(item: &van_sale_items::Model) -> LoadedLine {
    LoadedLine {
        item_id: item.id,
        product_id: item.product_id,
        loaded: item.loaded_quantity,
        unit_price: item.unit_price,
    }
}

async fn lock_van_sale<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<van_sales::Model, VanSaleRepoError> {
    van_sales::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(VanSaleRepoError::NotFound(id))
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    van_sale_id: Uuid,
) -> Result<Vec<van_sale_items::Model>, DbErr> {
    van_sale_items::Entity::find()
        .filter(van_sale_items::Column::VanSaleId.eq(van_sale_id))
        .order_by_asc(van_sale_items::Column::Id)
        .all(conn)
        .await
}

#[cfg(test)]
#[path = "van_sale_tests.rs"]
mod tests;
