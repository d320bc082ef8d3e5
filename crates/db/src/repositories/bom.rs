//! Bill of materials repository.

use std::collections::HashMap;

use comptoir_core::manufacturing::{
    BomComponent, CostedComponent, ManufacturingError, bom_unit_cost, validate_bom,
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::common::fetch_page;
use super::stock::StockWriter;
use crate::entities::{bills_of_materials, bom_components, production_orders, products};

/// Error types for BOM operations.
#[derive(Debug, thiserror::Error)]
pub enum BomError {
    /// BOM not found.
    #[error("Bill of materials not found: {0}")]
    NotFound(Uuid),

    /// Finished product or component does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Production orders reference the BOM.
    #[error("Bill of materials is used by production orders")]
    InUse,

    /// Invalid recipe.
    #[error(transparent)]
    Rule(#[from] ManufacturingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a BOM.
#[derive(Debug, Clone)]
pub struct BomInput {
    /// Finished product.
    pub product_id: Uuid,
    /// Name of the recipe.
    pub name: String,
    /// Units produced by one batch of the components.
    pub output_quantity: Decimal,
    /// Notes.
    pub notes: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Components.
    pub components: Vec<BomComponent>,
}

/// A BOM with its components.
#[derive(Debug, Clone, Serialize)]
pub struct BomWithComponents {
    /// Header.
    #[serde(flatten)]
    pub bom: bills_of_materials::Model,
    /// Components.
    pub components: Vec<bom_components::Model>,
}

/// Material cost of a BOM at current component costs.
#[derive(Debug, Clone, Serialize)]
pub struct BomCost {
    /// BOM.
    pub bom_id: Uuid,
    /// Units per batch.
    pub output_quantity: Decimal,
    /// Components with their current cost.
    pub components: Vec<CostedComponent>,
    /// Cost of one unit of output.
    pub unit_cost: Decimal,
}

/// Filter options for listing BOMs.
#[derive(Debug, Clone, Default)]
pub struct BomFilter {
    /// Finished product.
    pub product_id: Option<Uuid>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// BOM repository.
#[derive(Debug, Clone)]
pub struct BomRepository {
    db: DatabaseConnection,
}

impl BomRepository {
    /// Creates a new BOM repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn check_input(&self, input: &BomInput) -> Result<(), BomError> {
        validate_bom(input.product_id, input.output_quantity, &input.components)?;
        let ids = std::iter::once(input.product_id)
            .chain(input.components.iter().map(|c| c.component_id));
        if let Some(missing) = StockWriter::find_missing(&self.db, ids).await? {
            return Err(BomError::ProductNotFound(missing));
        }
        Ok(())
    }

    /// Creates a BOM with its components.
    ///
    /// # Errors
    ///
    /// Returns `Rule` for an invalid recipe and `ProductNotFound` for unknown
    /// products.
    pub async fn create(&self, input: BomInput) -> Result<BomWithComponents, BomError> {
        self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let bom = bills_of_materials::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            name: Set(input.name),
            output_quantity: Set(input.output_quantity),
            notes: Set(input.notes),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let components = insert_components(&txn, bom.id, &input.components).await?;
        txn.commit().await?;

        tracing::info!(bom_id = %bom.id, product_id = %bom.product_id, "bom created");
        Ok(BomWithComponents { bom, components })
    }

    /// Finds a BOM with its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BomWithComponents>, DbErr> {
        let Some(bom) = bills_of_materials::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let components = load_components(&self.db, id).await?;
        Ok(Some(BomWithComponents { bom, components }))
    }

    /// Lists BOM headers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &BomFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<bills_of_materials::Model>, DbErr> {
        let mut query = bills_of_materials::Entity::find();
        if let Some(product_id) = filter.product_id {
            query = query.filter(bills_of_materials::Column::ProductId.eq(product_id));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(bills_of_materials::Column::IsActive.eq(is_active));
        }
        let query = query.order_by_asc(bills_of_materials::Column::Name);
        fetch_page(&self.db, query, page).await
    }

    /// Replaces the header and the whole component list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Rule` or `ProductNotFound`.
    pub async fn update(&self, id: Uuid, input: BomInput) -> Result<BomWithComponents, BomError> {
        let bom = bills_of_materials::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BomError::NotFound(id))?;
        self.check_input(&input).await?;

        let txn = self.db.begin().await?;
        let mut active: bills_of_materials::ActiveModel = bom.into();
        active.product_id = Set(input.product_id);
        active.name = Set(input.name);
        active.output_quantity = Set(input.output_quantity);
        active.notes = Set(input.notes);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(chrono::Utc::now().into());
        let bom = active.update(&txn).await?;

        bom_components::Entity::delete_many()
            .filter(bom_components::Column::BomId.eq(id))
            .exec(&txn)
            .await?;
        let components = insert_components(&txn, id, &input.components).await?;
        txn.commit().await?;

        Ok(BomWithComponents { bom, components })
    }

    /// Deletes a BOM that no production order references.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: Uuid) -> Result<(), BomError> {
        if bills_of_materials::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(BomError::NotFound(id));
        }
        let used = production_orders::Entity::find()
            .filter(production_orders::Column::BomId.eq(id))
            .one(&self.db)
            .await?
            .is_some();
        if used {
            return Err(BomError::InUse);
        }

        let txn = self.db.begin().await?;
        bom_components::Entity::delete_many()
            .filter(bom_components::Column::BomId.eq(id))
            .exec(&txn)
            .await?;
        bills_of_materials::Entity::delete_by_id(id)
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Material cost of the BOM at the components' current average cost.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `ProductNotFound` for a deleted component.
    pub async fn cost(&self, id: Uuid) -> Result<BomCost, BomError> {
        let bom = self.find_by_id(id).await?.ok_or(BomError::NotFound(id))?;
        let ids: Vec<Uuid> = bom.components.iter().map(|c| c.component_id).collect();
        let costs: HashMap<Uuid, Decimal> = products::Entity::find()
            .filter(products::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.unit_cost))
            .collect();
        let costed =
            cost_components(&bom.components, &costs).map_err(BomError::ProductNotFound)?;
        let unit_cost = bom_unit_cost(&costed, bom.bom.output_quantity)?;
        Ok(BomCost {
            bom_id: id,
            output_quantity: bom.bom.output_quantity,
            components: costed,
            unit_cost,
        })
    }
}

/// Attaches each component's unit cost from `costs`; yields the first
/// component missing from the map as the error.
pub(crate) fn cost_components(
    components: &[bom_components::Model],
    costs: &HashMap<Uuid, Decimal>,
) -> Result<Vec<CostedComponent>, Uuid> {
    components
        .iter()
        .map(|c| {
            let unit_cost = costs.get(&c.component_id).copied().ok_or(c.component_id)?;
            Ok(CostedComponent {
                component_id: c.component_id,
                quantity: c.quantity,
                unit_cost,
            })
        })
        .collect()
}

pub(crate) async fn load_components<C: ConnectionTrait>(
    conn: &C,
    bom_id: Uuid,
) -> Result<Vec<bom_components::Model>, DbErr> {
    bom_components::Entity::find()
        .filter(bom_components::Column::BomId.eq(bom_id))
        .order_by_asc(bom_components::Column::Id)
        .all(conn)
        .await
}

async fn insert_components<C: ConnectionTrait>(
    conn: &C,
    bom_id: Uuid,
    components: &[BomComponent],
) -> Result<Vec<bom_components::Model>, DbErr> {
    let mut rows = Vec::with_capacity(components.len());
    for component in components {
        let row = bom_components::ActiveModel {
            id: Set(Uuid::new_v4()),
            bom_id: Set(bom_id),
            component_id: Set(component.component_id),
            quantity: Set(component.quantity),
        }
        .insert(conn)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "bom_tests.rs"]
mod tests;
