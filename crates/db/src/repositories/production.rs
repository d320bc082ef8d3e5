//! Production order repository.
//!
//! Completing an order consumes the components listed by its BOM and books
//! the finished product into stock at the BOM's material cost.

use std::collections::HashMap;

use chrono::NaiveDate;
use comptoir_core::manufacturing::{
    BomComponent, ManufacturingError, ProductionStatus as CoreStatus, bom_unit_cost,
    material_requirements,
};
use comptoir_shared::types::{PageRequest, PageResponse, QUANTITY_SCALE, ensure_fits};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::bom::{cost_components, load_components};
use super::common::{fetch_page, is_unique_violation, next_reference};
use super::stock::{MovementSource, StockWriter, position_of};
use crate::entities::{
    bills_of_materials, production_orders,
    sea_orm_active_enums::{MovementType, ProductionStatus},
};

const REFERENCE_PREFIX: &str = "MO";
const REFERENCE_TYPE: &str = "production_order";

/// Error types for production orders.
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    /// Order not found.
    #[error("Production order not found: {0}")]
    NotFound(Uuid),

    /// BOM not found.
    #[error("Bill of materials not found: {0}")]
    BomNotFound(Uuid),

    /// BOM is deactivated.
    #[error("Bill of materials {0} is inactive")]
    BomInactive(Uuid),

    /// Product row missing while moving stock.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Order can only be deleted while planned or cancelled.
    #[error("Only planned or cancelled production orders can be deleted")]
    NotDeletable,

    /// Reference collision.
    #[error("Reference '{0}' already exists")]
    DuplicateReference(String),

    /// Business rule violation.
    #[error(transparent)]
    Rule(#[from] ManufacturingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for planning a production order.
#[derive(Debug, Clone)]
pub struct CreateProductionInput {
    /// Recipe to follow.
    pub bom_id: Uuid,
    /// Units of finished product to make.
    pub quantity: Decimal,
    /// Planned date; today when absent.
    pub planned_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
}

/// Filter options for listing production orders.
#[derive(Debug, Clone, Default)]
pub struct ProductionFilter {
    /// Status.
    pub status: Option<ProductionStatus>,
    /// Finished product.
    pub product_id: Option<Uuid>,
    /// Planned from (inclusive).
    pub from: Option<NaiveDate>,
    /// Planned to (inclusive).
    pub to: Option<NaiveDate>,
}

/// Production order repository.
#[derive(Debug, Clone)]
pub struct ProductionOrderRepository {
    db: DatabaseConnection,
}

impl ProductionOrderRepository {
    /// Creates a new production order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Plans an order for an active BOM.
    ///
    /// # Errors
    ///
    /// Returns `BomNotFound`, `BomInactive`, or `Rule` for a non-positive or
    /// oversize quantity.
    pub async fn create(
        &self,
        input: CreateProductionInput,
        user_id: Option<Uuid>,
    ) -> Result<production_orders::Model, ProductionError> {
        if input.quantity <= Decimal::ZERO {
            return Err(ManufacturingError::NonPositiveQuantity.into());
        }
        ensure_fits(input.quantity, QUANTITY_SCALE, "quantity")
            .map_err(ManufacturingError::from)?;
        let bom = bills_of_materials::Entity::find_by_id(input.bom_id)
            .one(&self.db)
            .await?
            .ok_or(ProductionError::BomNotFound(input.bom_id))?;
        if !bom.is_active {
            return Err(ProductionError::BomInactive(bom.id));
        }

        let txn = self.db.begin().await?;
        let planned_date = input
            .planned_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let reference = next_reference::<production_orders::Entity, _>(
            &txn,
            production_orders::Column::Reference,
            REFERENCE_PREFIX,
            planned_date,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let order = production_orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(reference.clone()),
            bom_id: Set(bom.id),
            product_id: Set(bom.product_id),
            quantity: Set(input.quantity),
            status: Set(ProductionStatus::Planned),
            planned_date: Set(planned_date),
            unit_cost: Set(None),
            notes: Set(input.notes),
            created_by: Set(user_id),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ProductionError::DuplicateReference(reference)
            } else {
                ProductionError::Database(e)
            }
        })?;
        txn.commit().await?;

        tracing::info!(
            order_id = %order.id,
            reference = %order.reference,
            quantity = %order.quantity,
            "production order planned"
        );
        Ok(order)
    }

    /// Finds an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<production_orders::Model>, DbErr> {
        production_orders::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists orders, latest planned first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProductionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<production_orders::Model>, DbErr> {
        let mut query = production_orders::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(production_orders::Column::Status.eq(status));
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(production_orders::Column::ProductId.eq(product_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(production_orders::Column::PlannedDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(production_orders::Column::PlannedDate.lte(to));
        }
        let query = query
            .order_by_desc(production_orders::Column::PlannedDate)
            .order_by_desc(production_orders::Column::Reference);
        fetch_page(&self.db, query, page).await
    }

    /// Planned → in progress.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for any other status.
    pub async fn start(&self, id: Uuid) -> Result<production_orders::Model, ProductionError> {
        let order = self
            .find_by_id(id)
            .await?
            .ok_or(ProductionError::NotFound(id))?;
        let next = CoreStatus::from(order.status).start()?;

        let now = chrono::Utc::now().into();
        let mut active: production_orders::ActiveModel = order.into();
        active.status = Set(next.into());
        active.started_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.db).await?)
    }

    /// Completes an order in one transaction: components are issued, the
    /// output is received at the BOM material cost.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rule` for a final status or a component
    /// shortage.
    pub async fn complete(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<production_orders::Model, ProductionError> {
        let txn = self.db.begin().await?;
        let order = lock_order(&txn, id).await?;
        let next = CoreStatus::from(order.status).complete()?;

        let bom = bills_of_materials::Entity::find_by_id(order.bom_id)
            .one(&txn)
            .await?
            .ok_or(ProductionError::BomNotFound(order.bom_id))?;
        let components = load_components(&txn, bom.id).await?;
        let recipe: Vec<BomComponent> = components
            .iter()
            .map(|c| BomComponent {
                component_id: c.component_id,
                quantity: c.quantity,
            })
            .collect();
        let requirements = material_requirements(&recipe, bom.output_quantity, order.quantity)?;

        let ids = requirements
            .iter()
            .map(|r| r.product_id)
            .chain(std::iter::once(order.product_id));
        let mut products = StockWriter::lock_products(&txn, ids).await?;
        StockWriter::check_available(&products, requirements.iter().copied())
            .map_err(ManufacturingError::from)?;

        let costs: HashMap<Uuid, Decimal> =
            products.iter().map(|(id, p)| (*id, p.unit_cost)).collect();
        let costed =
            cost_components(&components, &costs).map_err(ProductionError::ProductNotFound)?;
        let unit_cost = bom_unit_cost(&costed, bom.output_quantity)?;

        let consumption = MovementSource::document(
            MovementType::ProductionConsumption,
            REFERENCE_TYPE,
            id,
            user_id,
        );
        for requirement in &requirements {
            let product = products
                .remove(&requirement.product_id)
                .ok_or(ProductionError::ProductNotFound(requirement.product_id))?;
            let position = position_of(&product);
            let after = position
                .issue(requirement.quantity)
                .map_err(ManufacturingError::from)?;
            StockWriter::apply(&txn, product, after, position.unit_cost, &consumption).await?;
        }

        let output = products
            .remove(&order.product_id)
            .ok_or(ProductionError::ProductNotFound(order.product_id))?;
        let after = position_of(&output)
            .receive(order.quantity, unit_cost)
            .map_err(ManufacturingError::from)?;
        let source =
            MovementSource::document(MovementType::ProductionOutput, REFERENCE_TYPE, id, user_id);
        StockWriter::apply(&txn, output, after, unit_cost, &source).await?;

        let now = chrono::Utc::now().into();
        let mut active: production_orders::ActiveModel = order.into();
        active.status = Set(next.into());
        active.unit_cost = Set(Some(unit_cost));
        active.completed_at = Set(Some(now));
        active.updated_at = Set(now);
        let order = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            order_id = %id,
            quantity = %order.quantity,
            unit_cost = %unit_cost,
            "production order completed"
        );
        Ok(order)
    }

    /// Cancels a planned or in-progress order. Nothing was consumed yet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Rule` for a final status.
    pub async fn cancel(&self, id: Uuid) -> Result<production_orders::Model, ProductionError> {
        let order = self
            .find_by_id(id)
            .await?
            .ok_or(ProductionError::NotFound(id))?;
        let next = CoreStatus::from(order.status).cancel()?;

        let mut active: production_orders::ActiveModel = order.into();
        active.status = Set(next.into());
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a planned or cancelled order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `NotDeletable`.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductionError> {
        let order = self
            .find_by_id(id)
            .await?
            .ok_or(ProductionError::NotFound(id))?;
        if !CoreStatus::from(order.status).is_deletable() {
            return Err(ProductionError::NotDeletable);
        }
        production_orders::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

async fn lock_order<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<production_orders::Model, ProductionError> {
    production_orders::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(ProductionError::NotFound(id))
}

#[cfg(test)]
#[path = "production_tests.rs"]
mod tests;
