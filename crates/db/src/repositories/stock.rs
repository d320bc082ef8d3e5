//! Writes stock positions and their movement rows.
//!
//! Every change to `products.quantity` or `products.unit_cost` goes through
//! [`StockWriter::apply`] inside the caller's transaction, so the product row
//! and its movement history never disagree.

use std::collections::HashMap;

use comptoir_core::inventory::{
    InventoryError, StockPosition, StockRequirement, aggregate_requirements, check_availability,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::entities::{products, sea_orm_active_enums::MovementType, stock_movements};

/// Where a movement comes from.
#[derive(Debug, Clone)]
pub struct MovementSource {
    /// Movement type recorded on the row.
    pub movement_type: MovementType,
    /// Document kind, e.g. `purchase`.
    pub reference_type: Option<&'static str>,
    /// Document id.
    pub reference_id: Option<Uuid>,
    /// Free text (adjustment reason).
    pub note: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

impl MovementSource {
    /// Movement caused by a document.
    #[must_use]
    pub const fn document(
        movement_type: MovementType,
        reference_type: &'static str,
        reference_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Self {
        Self {
            movement_type,
            reference_type: Some(reference_type),
            reference_id: Some(reference_id),
            note: None,
            created_by,
        }
    }
}

/// Current stock position of a product row.
#[must_use]
pub fn position_of(product: &products::Model) -> StockPosition {
    StockPosition::new(product.quantity, product.unit_cost)
}

/// Stateless helper; every method takes the transaction it runs in.
pub struct StockWriter;

impl StockWriter {
    /// Loads products with `FOR UPDATE`, keyed by id.
    pub async fn lock_products<C: ConnectionTrait>(
        conn: &C,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, products::Model>, DbErr> {
        let ids: Vec<Uuid> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = products::Entity::find()
            .filter(products::Column::Id.is_in(ids))
            .lock_exclusive()
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Aggregates `requirements` per product and checks them against the
    /// locked rows, so split lines cannot overdraw.
    pub fn check_available(
        products: &HashMap<Uuid, products::Model>,
        requirements: impl IntoIterator<Item = StockRequirement>,
    ) -> Result<(), InventoryError> {
        let on_hand: HashMap<Uuid, Decimal> =
            products.iter().map(|(id, p)| (*id, p.quantity)).collect();
        check_availability(&aggregate_requirements(requirements), &on_hand)
    }

    /// First id in `ids` with no product row, if any.
    pub async fn find_missing<C: ConnectionTrait>(
        conn: &C,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Result<Option<Uuid>, DbErr> {
        let ids: Vec<Uuid> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(None);
        }
        let found: Vec<Uuid> = products::Entity::find()
            .select_only()
            .column(products::Column::Id)
            .filter(products::Column::Id.is_in(ids.clone()))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(ids.into_iter().find(|id| !found.contains(id)))
    }

    /// Persists `after` on the product and records the movement.
    ///
    /// The signed movement quantity is `after.on_hand - product.quantity`.
    /// `movement_cost` is the cost the goods moved at: the incoming cost for
    /// receipts, the current average for issues.
    pub async fn apply<C: ConnectionTrait>(
        conn: &C,
        product: products::Model,
        after: StockPosition,
        movement_cost: Decimal,
        source: &MovementSource,
    ) -> Result<(products::Model, stock_movements::Model), DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let delta = after.on_hand - product.quantity;
        let product_id = product.id;

        let mut active: products::ActiveModel = product.into();
        active.quantity = Set(after.on_hand);
        active.unit_cost = Set(after.unit_cost);
        active.updated_at = Set(now);
        let product = active.update(conn).await?;

        let movement = stock_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            movement_type: Set(source.movement_type),
            quantity: Set(delta),
            unit_cost: Set(movement_cost),
            balance_after: Set(after.on_hand),
            reference_type: Set(source.reference_type.map(str::to_string)),
            reference_id: Set(source.reference_id),
            note: Set(source.note.clone()),
            created_by: Set(source.created_by),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        Ok((product, movement))
    }
}
