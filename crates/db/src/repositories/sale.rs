//! Sales repository: drafts, confirmation (stock issue), cancellation and
//! payments.

use chrono::NaiveDate;
use comptoir_core::inventory::StockRequirement;
use comptoir_core::sales::{
    self as sale_rules, SaleLine, SaleRuleError, SaleStatus as CoreStatus, SaleTotals,
    apply_payment, compute_totals, line_total,
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
    clients, commercials, sale_items, sales,
    sea_orm_active_enums::{MovementType, PaymentStatus, SaleStatus},
};

const REFERENCE_PREFIX: &str = "SO";
const REFERENCE_TYPE: &str = "sale";

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Commercial not found.
    #[error("Commercial not found: {0}")]
    CommercialNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Another sale took the same reference concurrently.
    #[error("Sale reference '{0}' already exists")]
    DuplicateReference(String),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] SaleRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a sale.
#[derive(Debug, Clone)]
pub struct SaleInput {
    /// Client; `None` for a walk-in customer.
    pub client_id: Option<Uuid>,
    /// Commercial credited with the sale.
    pub commercial_id: Option<Uuid>,
    /// Sale date; defaults to today.
    pub sale_date: Option<NaiveDate>,
    /// Order-level discount amount.
    pub discount_amount: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Notes.
    pub notes: Option<String>,
    /// Lines.
    pub items: Vec<SaleLine>,
}

/// Filter options for listing sales.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Status.
    pub status: Option<SaleStatus>,
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Client.
    pub client_id: Option<Uuid>,
    /// Commercial.
    pub commercial_id: Option<Uuid>,
    /// Sale date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Sale date to (inclusive).
    pub to: Option<NaiveDate>,
}

/// Sale with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    /// Header.
    #[serde(flatten)]
    pub sale: sales::Model,
    /// Lines.
    pub items: Vec<sale_items::Model>,
}

/// Sales repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft sale. No stock moves until confirmation.
    ///
    /// # Errors
    ///
    /// Returns `Rule` for invalid lines or totals, or a not-found error for a
    /// dangling client, commercial or product.
    pub async fn create(
        &self,
        input: SaleInput,
        user_id: Option<Uuid>,
    ) -> Result<SaleWithItems, SaleError> {
        let totals = self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let sale_date = input
            .sale_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let reference = next_reference::<sales::Entity, _>(
            &txn,
            sales::Column::Reference,
            REFERENCE_PREFIX,
            sale_date,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let sale = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(reference.clone()),
            client_id: Set(input.client_id),
            commercial_id: Set(input.commercial_id),
            status: Set(SaleStatus::Draft),
            payment_status: Set(PaymentStatus::Unpaid),
            sale_date: Set(sale_date),
            subtotal: Set(totals.subtotal),
            discount_amount: Set(totals.discount),
            tax_rate: Set(input.tax_rate),
            tax_amount: Set(totals.tax),
            total_amount: Set(totals.total),
            paid_amount: Set(Decimal::ZERO),
            notes: Set(input.notes),
            created_by: Set(user_id),
            confirmed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SaleError::DuplicateReference(reference)
            } else {
                SaleError::Database(e)
            }
        })?;

        let items = insert_items(&txn, sale.id, &input.items).await?;
        txn.commit().await?;

        tracing::info!(
            sale_id = %sale.id,
            reference = %sale.reference,
            total = %sale.total_amount,
            "sale created"
        );
        Ok(SaleWithItems { sale, items })
    }

    async fn check_input(&self, input: &SaleInput) -> Result<SaleTotals, SaleError> {
        let totals = compute_totals(&input.items, input.discount_amount, input.tax_rate)?;

        if let Some(client_id) = input.client_id
            && clients::Entity::find_by_id(client_id)
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(SaleError::ClientNotFound(client_id));
        }
        if let Some(commercial_id) = input.commercial_id
            && commercials::Entity::find_by_id(commercial_id)
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(SaleError::CommercialNotFound(commercial_id));
        }
        if let Some(missing) =
            StockWriter::find_missing(&self.db, input.items.iter().map(|l| l.product_id)).await?
        {
            return Err(SaleError::ProductNotFound(missing));
        }
        Ok(totals)
    }

    /// Finds a sale with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SaleWithItems>, DbErr> {
        let Some(sale) = sales::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = load_items(&self.db, id).await?;
        Ok(Some(SaleWithItems { sale, items }))
    }

    /// Lists sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &SaleFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<sales::Model>, DbErr> {
        let mut query = sales::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(sales::Column::Status.eq(status));
        }
        if let Some(payment_status) = filter.payment_status {
            query = query.filter(sales::Column::PaymentStatus.eq(payment_status));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(sales::Column::ClientId.eq(client_id));
        }
        if let Some(commercial_id) = filter.commercial_id {
            query = query.filter(sales::Column::CommercialId.eq(commercial_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(sales::Column::SaleDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(sales::Column::SaleDate.lte(to));
        }
        let query = query
            .order_by_desc(sales::Column::SaleDate)
            .order_by_desc(sales::Column::CreatedAt);
        fetch_page(&self.db, query, page).await
    }

    /// Replaces the header and lines of a draft.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule` for a non-draft or invalid input, or a
    /// not-found error for a dangling reference.
    pub async fn replace(&self, id: Uuid, input: SaleInput) -> Result<SaleWithItems, SaleError> {
        let totals = self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let sale = lock_sale(&txn, id).await?;
        sale_rules::ensure_editable(sale.status.into())?;

        sale_items::Entity::delete_many()
            .filter(sale_items::Column::SaleId.eq(id))
            .exec(&txn)
            .await?;
        let items = insert_items(&txn, id, &input.items).await?;

        let mut active: sales::ActiveModel = sale.into();
        active.client_id = Set(input.client_id);
        active.commercial_id = Set(input.commercial_id);
        if let Some(sale_date) = input.sale_date {
            active.sale_date = Set(sale_date);
        }
        active.subtotal = Set(totals.subtotal);
        active.discount_amount = Set(totals.discount);
        active.tax_rate = Set(input.tax_rate);
        active.tax_amount = Set(totals.tax);
        active.total_amount = Set(totals.total);
        active.notes = Set(input.notes);
        active.updated_at = Set(chrono::Utc::now().into());
        let sale = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(sale_id = %id, "sale replaced");
        Ok(SaleWithItems { sale, items })
    }

    /// Deletes a draft sale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for non-drafts.
    pub async fn delete(&self, id: Uuid) -> Result<(), SaleError> {
        let sale = sales::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(id))?;
        sale_rules::ensure_editable(sale.status.into())?;

        sales::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(sale_id = %id, "sale deleted");
        Ok(())
    }

    /// Confirms a draft in one transaction: checks the aggregated quantities
    /// against stock, issues every line, snapshots the cost on each line and
    /// writes `sale` movements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for an invalid transition or
    /// insufficient stock.
    pub async fn confirm(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<SaleWithItems, SaleError> {
        let txn = self.db.begin().await?;
        let sale = lock_sale(&txn, id).await?;
        let next = sale_rules::confirm(sale.status.into())?;

        let items = load_items(&txn, id).await?;
        let mut products =
            StockWriter::lock_products(&txn, items.iter().map(|i| i.product_id)).await?;
        StockWriter::check_available(
            &products,
            items
                .iter()
                .map(|i| StockRequirement::new(i.product_id, i.quantity)),
        )
        .map_err(SaleRuleError::from)?;

        let source = MovementSource::document(MovementType::Sale, REFERENCE_TYPE, id, user_id);
        for item in items {
            let product = products
                .remove(&item.product_id)
                .ok_or(SaleError::ProductNotFound(item.product_id))?;
            let position = position_of(&product);
            let after = position.issue(item.quantity).map_err(SaleRuleError::from)?;
            let (product, _) =
                StockWriter::apply(&txn, product, after, position.unit_cost, &source).await?;
            products.insert(product.id, product);

            let mut active: sale_items::ActiveModel = item.into();
            active.unit_cost = Set(Some(position.unit_cost));
            active.update(&txn).await?;
        }

        let now = chrono::Utc::now().into();
        let mut active: sales::ActiveModel = sale.into();
        active.status = Set(next.into());
        active.confirmed_at = Set(Some(now));
        active.updated_at = Set(now);
        let sale = active.update(&txn).await?;

        let items = load_items(&txn, id).await?;
        txn.commit().await?;

        tracing::info!(sale_id = %id, total = %sale.total_amount, "sale confirmed");
        Ok(SaleWithItems { sale, items })
    }

    /// Cancels a sale. A confirmed sale gives its stock back through
    /// `sale_cancellation` movements at the cost recorded on each line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` if the sale is already cancelled or has
    /// payments.
    pub async fn cancel(&self, id: Uuid, user_id: Option<Uuid>) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;
        let sale = lock_sale(&txn, id).await?;
        let current: CoreStatus = sale.status.into();
        let next = sale_rules::cancel(current, sale.paid_amount)?;

        if current == CoreStatus::Confirmed {
            let items = load_items(&txn, id).await?;
            let mut products =
                StockWriter::lock_products(&txn, items.iter().map(|i| i.product_id)).await?;
            let source = MovementSource::document(
                MovementType::SaleCancellation,
                REFERENCE_TYPE,
                id,
                user_id,
            );
            for item in &items {
                let product = products
                    .remove(&item.product_id)
                    .ok_or(SaleError::ProductNotFound(item.product_id))?;
                let position = position_of(&product);
                let after = position
                    .restock(item.quantity)
                    .map_err(SaleRuleError::from)?;
                let cost = item.unit_cost.unwrap_or(position.unit_cost);
                let (product, _) = StockWriter::apply(&txn, product, after, cost, &source).await?;
                products.insert(product.id, product);
            }
        }

        let mut active: sales::ActiveModel = sale.into();
        active.status = Set(next.into());
        active.updated_at = Set(chrono::Utc::now().into());
        let sale = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(sale_id = %id, "sale cancelled");
        Ok(sale)
    }

    /// Records a payment against a confirmed sale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for an unconfirmed sale, a non-positive
    /// amount or an overpayment.
    pub async fn record_payment(
        &self,
        id: Uuid,
        amount: Decimal,
    ) -> Result<sales::Model, SaleError> {
        let txn = self.db.begin().await?;
        let sale = lock_sale(&txn, id).await?;
        sale_rules::ensure_payable(sale.status.into())?;
        let (paid, status) = apply_payment(sale.total_amount, sale.paid_amount, amount)?;

        let mut active: sales::ActiveModel = sale.into();
        active.paid_amount = Set(paid);
        active.payment_status = Set(status.into());
        active.updated_at = Set(chrono::Utc::now().into());
        let sale = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(sale_id = %id, amount = %amount, paid = %paid, "payment recorded");
        Ok(sale)
    }
}

async fn lock_sale<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<sales::Model, SaleError> {
    sales::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(SaleError::NotFound(id))
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    sale_id: Uuid,
) -> Result<Vec<sale_items::Model>, DbErr> {
    sale_items::Entity::find()
        .filter(sale_items::Column::SaleId.eq(sale_id))
        .order_by_asc(sale_items::Column::Id)
        .all(conn)
        .await
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    sale_id: Uuid,
    lines: &[SaleLine],
) -> Result<Vec<sale_items::Model>, SaleError> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = sale_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            sale_id: Set(sale_id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            discount_percent: Set(line.discount_percent),
            unit_cost: Set(None),
            line_total: Set(line_total(line)?),
        }
        .insert(conn)
        .await?;
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
#[path = "sale_tests.rs"]
mod tests;
