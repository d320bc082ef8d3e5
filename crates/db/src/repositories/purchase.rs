//! Purchase order repository: drafts, confirmation and receiving.
//!
//! Receiving is the only place purchase costs reach the product catalogue:
//! each received line is booked through [`PurchaseService::apply_receipt`],
//! which blends the incoming cost into the product's weighted-average cost.

use chrono::NaiveDate;
use comptoir_core::purchasing::{
    PurchaseLine, PurchaseRuleError, PurchaseService, PurchaseStatus as CoreStatus,
    ReceiptOverride, ReceivableItem,
};
use comptoir_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation, next_reference};
use super::stock::{MovementSource, StockWriter, position_of};
use crate::entities::{
    purchase_items, purchases,
    sea_orm_active_enums::{MovementType, PurchaseStatus},
    suppliers,
};

const REFERENCE_PREFIX: &str = "PO";
const REFERENCE_TYPE: &str = "purchase";

/// Error types for purchase operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    NotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Another order took the same reference concurrently.
    #[error("Purchase reference '{0}' already exists")]
    DuplicateReference(String),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] PurchaseRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a purchase order.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    /// Supplier.
    pub supplier_id: Uuid,
    /// Order date; defaults to today.
    pub order_date: Option<NaiveDate>,
    /// Expected delivery date.
    pub expected_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
    /// Ordered lines.
    pub items: Vec<PurchaseLine>,
}

/// Filter options for listing purchase orders.
#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    /// Status.
    pub status: Option<PurchaseStatus>,
    /// Supplier.
    pub supplier_id: Option<Uuid>,
    /// Order date from (inclusive).
    pub from: Option<NaiveDate>,
    /// Order date to (inclusive).
    pub to: Option<NaiveDate>,
}

/// Purchase order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithItems {
    /// Header.
    #[serde(flatten)]
    pub purchase: purchases::Model,
    /// Lines.
    pub items: Vec<purchase_items::Model>,
}

/// Purchase order repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft purchase order.
    ///
    /// # Errors
    ///
    /// Returns `Rule` for invalid lines, `SupplierNotFound` or
    /// `ProductNotFound` for dangling references.
    pub async fn create(
        &self,
        input: PurchaseInput,
        user_id: Option<Uuid>,
    ) -> Result<PurchaseWithItems, PurchaseError> {
        self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let order_date = input
            .order_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let reference = next_reference::<purchases::Entity, _>(
            &txn,
            purchases::Column::Reference,
            REFERENCE_PREFIX,
            order_date,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let purchase = purchases::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(reference.clone()),
            supplier_id: Set(input.supplier_id),
            status: Set(PurchaseStatus::Draft),
            order_date: Set(order_date),
            expected_date: Set(input.expected_date),
            received_date: Set(None),
            total_amount: Set(PurchaseService::order_total(&input.items)?),
            notes: Set(input.notes),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PurchaseError::DuplicateReference(reference)
            } else {
                PurchaseError::Database(e)
            }
        })?;

        let items = insert_items(&txn, purchase.id, &input.items).await?;
        txn.commit().await?;

        tracing::info!(
            purchase_id = %purchase.id,
            reference = %purchase.reference,
            total = %purchase.total_amount,
            "purchase order created"
        );
        Ok(PurchaseWithItems { purchase, items })
    }

    async fn check_input(&self, input: &PurchaseInput) -> Result<(), PurchaseError> {
        PurchaseService::validate_lines(&input.items)?;

        if suppliers::Entity::find_by_id(input.supplier_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(PurchaseError::SupplierNotFound(input.supplier_id));
        }
        if let Some(missing) =
            StockWriter::find_missing(&self.db, input.items.iter().map(|l| l.product_id)).await?
        {
            return Err(PurchaseError::ProductNotFound(missing));
        }
        Ok(())
    }

    /// Finds a purchase order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PurchaseWithItems>, DbErr> {
        let Some(purchase) = purchases::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = load_items(&self.db, id).await?;
        Ok(Some(PurchaseWithItems { purchase, items }))
    }

    /// Lists purchase orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PurchaseFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<purchases::Model>, DbErr> {
        let mut query = purchases::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(purchases::Column::Status.eq(status));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(purchases::Column::SupplierId.eq(supplier_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(purchases::Column::OrderDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(purchases::Column::OrderDate.lte(to));
        }
        let query = query
            .order_by_desc(purchases::Column::OrderDate)
            .order_by_desc(purchases::Column::CreatedAt);
        fetch_page(&self.db, query, page).await
    }

    /// Replaces the header and lines of a draft.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule` when the order is no longer a draft or the
    /// new lines are invalid, or a dangling-reference error.
    pub async fn replace(
        &self,
        id: Uuid,
        input: PurchaseInput,
    ) -> Result<PurchaseWithItems, PurchaseError> {
        self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let purchase = lock_purchase(&txn, id).await?;
        PurchaseService::ensure_editable(purchase.status.into())?;

        purchase_items::Entity::delete_many()
            .filter(purchase_items::Column::PurchaseId.eq(id))
            .exec(&txn)
            .await?;
        let items = insert_items(&txn, id, &input.items).await?;

        let mut active: purchases::ActiveModel = purchase.into();
        active.supplier_id = Set(input.supplier_id);
        if let Some(order_date) = input.order_date {
            active.order_date = Set(order_date);
        }
        active.expected_date = Set(input.expected_date);
        active.notes = Set(input.notes);
        active.total_amount = Set(PurchaseService::order_total(&input.items)?);
        active.updated_at = Set(chrono::Utc::now().into());
        let purchase = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(purchase_id = %id, "purchase order replaced");
        Ok(PurchaseWithItems { purchase, items })
    }

    /// Deletes a draft; its lines go with it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for non-drafts.
    pub async fn delete(&self, id: Uuid) -> Result<(), PurchaseError> {
        let purchase = purchases::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseError::NotFound(id))?;
        PurchaseService::ensure_editable(purchase.status.into())?;

        purchases::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(purchase_id = %id, "purchase order deleted");
        Ok(())
    }

    /// Confirms a draft. Every line's `received_quantity` is set to its
    /// ordered quantity, the expected receipt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for an invalid transition.
    pub async fn confirm(&self, id: Uuid) -> Result<PurchaseWithItems, PurchaseError> {
        let txn = self.db.begin().await?;
        let purchase = lock_purchase(&txn, id).await?;
        let next = PurchaseService::confirm(purchase.status.into())?;

        purchase_items::Entity::update_many()
            .col_expr(
                purchase_items::Column::ReceivedQuantity,
                Expr::col(purchase_items::Column::Quantity).into(),
            )
            .filter(purchase_items::Column::PurchaseId.eq(id))
            .exec(&txn)
            .await?;

        let purchase = set_status(&txn, purchase, next, None).await?;
        let items = load_items(&txn, id).await?;
        txn.commit().await?;

        tracing::info!(purchase_id = %id, "purchase order confirmed");
        Ok(PurchaseWithItems { purchase, items })
    }

    /// Receives a confirmed order in one transaction.
    ///
    /// Lines default to the quantity recorded at confirmation; `overrides`
    /// records partial or missing deliveries. Every line with a positive
    /// quantity raises stock, updates the product's weighted-average cost and
    /// writes a `purchase_receipt` movement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule` for an invalid transition or override, or
    /// `ProductNotFound` if a product vanished.
    pub async fn receive(
        &self,
        id: Uuid,
        overrides: &[ReceiptOverride],
        user_id: Option<Uuid>,
    ) -> Result<PurchaseWithItems, PurchaseError> {
        let txn = self.db.begin().await?;
        let purchase = lock_purchase(&txn, id).await?;
        let next = PurchaseService::receive(purchase.status.into())?;

        let items = load_items(&txn, id).await?;
        let receivable: Vec<ReceivableItem> = items
            .iter()
            .map(|item| ReceivableItem {
                item_id: item.id,
                product_id: item.product_id,
                ordered: item.quantity,
                received: item.received_quantity,
                unit_cost: item.unit_cost,
            })
            .collect();
        let plan = PurchaseService::plan_receipt(&receivable, overrides)?;

        let mut products =
            StockWriter::lock_products(&txn, plan.iter().map(|l| l.product_id)).await?;
        let source =
            MovementSource::document(MovementType::PurchaseReceipt, REFERENCE_TYPE, id, user_id);

        for line in &plan {
            if !line.quantity.is_zero() {
                let product = products
                    .remove(&line.product_id)
                    .ok_or(PurchaseError::ProductNotFound(line.product_id))?;
                let after = PurchaseService::apply_receipt(position_of(&product), line)?;
                let (product, _) =
                    StockWriter::apply(&txn, product, after, line.unit_cost, &source).await?;
                products.insert(product.id, product);
            }

            purchase_items::Entity::update_many()
                .col_expr(
                    purchase_items::Column::ReceivedQuantity,
                    Expr::value(line.quantity),
                )
                .filter(purchase_items::Column::Id.eq(line.item_id))
                .exec(&txn)
                .await?;
        }

        let today = chrono::Utc::now().date_naive();
        let purchase = set_status(&txn, purchase, next, Some(today)).await?;
        let items = load_items(&txn, id).await?;
        txn.commit().await?;

        tracing::info!(
            purchase_id = %id,
            lines = plan.len(),
            "purchase order received"
        );
        Ok(PurchaseWithItems { purchase, items })
    }

    /// Cancels a draft or confirmed order. Stock is untouched: nothing was
    /// received yet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for an invalid transition.
    pub async fn cancel(&self, id: Uuid) -> Result<purchases::Model, PurchaseError> {
        let txn = self.db.begin().await?;
        let purchase = lock_purchase(&txn, id).await?;
        let next = PurchaseService::cancel(purchase.status.into())?;
        let purchase = set_status(&txn, purchase, next, None).await?;
        txn.commit().await?;

        tracing::info!(purchase_id = %id, "purchase order cancelled");
        Ok(purchase)
    }
}

async fn lock_purchase<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<purchases::Model, PurchaseError> {
    purchases::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(PurchaseError::NotFound(id))
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    purchase_id: Uuid,
) -> Result<Vec<purchase_items::Model>, DbErr> {
    purchase_items::Entity::find()
        .filter(purchase_items::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_items::Column::Id)
        .all(conn)
        .await
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    purchase_id: Uuid,
    lines: &[PurchaseLine],
) -> Result<Vec<purchase_items::Model>, PurchaseError> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = purchase_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_id: Set(purchase_id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            received_quantity: Set(rust_decimal::Decimal::ZERO),
            unit_cost: Set(line.unit_cost),
            line_total: Set(PurchaseService::line_total(line.quantity, line.unit_cost)?),
        }
        .insert(conn)
        .await?;
        items.push(item);
    }
    Ok(items)
}

async fn set_status<C: ConnectionTrait>(
    conn: &C,
    purchase: purchases::Model,
    status: CoreStatus,
    received_date: Option<NaiveDate>,
) -> Result<purchases::Model, DbErr> {
    let mut active: purchases::ActiveModel = purchase.into();
    active.status = Set(status.into());
    if received_date.is_some() {
        active.received_date = Set(received_date);
    }
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await
}

#[cfg(test)]
#[path = "purchase_tests.rs"]
mod tests;
