//! Product repository: catalogue, stock adjustments and movement history.

use comptoir_core::inventory::InventoryError;
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use super::common::{fetch_page, is_unique_violation};
use super::stock::{MovementSource, StockWriter, position_of};
use crate::entities::{
    bills_of_materials, bom_components, production_orders, products, purchase_items, sale_items,
    sea_orm_active_enums::{MovementType, ProductKind},
    stock_movements, van_sale_items,
};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// SKU already used by another product.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// Product is referenced and cannot be deleted.
    #[error("Cannot delete product: it is referenced by {0}")]
    InUse(&'static str),

    /// Stock rule violation.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ProductError {
    fn from_write(err: DbErr, sku: &str) -> Self {
        if is_unique_violation(&err) {
            Self::DuplicateSku(sku.to_string())
        } else {
            Self::Database(err)
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Stock keeping unit, unique.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Raw material, finished good or merchandise.
    pub kind: ProductKind,
    /// Unit of measure (`pcs`, `kg`, ...).
    pub unit: String,
    /// Default selling price.
    pub sale_price: Decimal,
    /// Opening unit cost.
    pub unit_cost: Decimal,
    /// Low-stock threshold; zero disables the alert.
    pub reorder_level: Decimal,
}

/// Input for updating a product.
///
/// Stock quantity is absent on purpose: it only changes through movements.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// SKU.
    pub sku: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Kind.
    pub kind: Option<ProductKind>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Selling price.
    pub sale_price: Option<Decimal>,
    /// Reorder level.
    pub reorder_level: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Filter options for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring of the name or SKU.
    pub search: Option<String>,
    /// Kind.
    pub kind: Option<ProductKind>,
    /// Active flag.
    pub is_active: Option<bool>,
    /// Only products at or below their reorder level.
    pub low_stock: bool,
}

/// Manual stock adjustment.
#[derive(Debug, Clone)]
pub struct AdjustStockInput {
    /// Signed quantity: positive adds, negative removes.
    pub delta: Decimal,
    /// Why the count changed (breakage, stocktake, ...).
    pub reason: String,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product with zero stock.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSku` if the SKU is taken.
    pub async fn create(&self, input: CreateProductInput) -> Result<products::Model, ProductError> {
        let sku = input.sku.trim().to_string();
        let existing = products::Entity::find()
            .filter(products::Column::Sku.eq(&sku))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ProductError::DuplicateSku(sku));
        }

        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(sku.clone()),
            name: Set(input.name),
            description: Set(input.description),
            kind: Set(input.kind),
            unit: Set(input.unit),
            sale_price: Set(input.sale_price),
            unit_cost: Set(input.unit_cost),
            quantity: Set(Decimal::ZERO),
            reorder_level: Set(input.reorder_level),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        product
            .insert(&self.db)
            .await
            .map_err(|e| ProductError::from_write(e, &sku))
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists products by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<products::Model>, DbErr> {
        let mut query = products::Entity::find();

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Name.contains(search))
                    .add(products::Column::Sku.contains(search)),
            );
        }
        if let Some(kind) = filter.kind {
            query = query.filter(products::Column::Kind.eq(kind));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(products::Column::IsActive.eq(is_active));
        }
        if filter.low_stock {
            query = query
                .filter(products::Column::ReorderLevel.gt(Decimal::ZERO))
                .filter(
                    Expr::col(products::Column::Quantity)
                        .lte(Expr::col(products::Column::ReorderLevel)),
                );
        }

        fetch_page(&self.db, query.order_by_asc(products::Column::Name), page).await
    }

    /// Updates a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `DuplicateSku`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = self
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let mut sku = product.sku.clone();
        if let Some(new_sku) = input.sku.as_deref().map(str::trim)
            && new_sku != product.sku
        {
            let taken = products::Entity::find()
                .filter(products::Column::Sku.eq(new_sku))
                .filter(products::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if taken.is_some() {
                return Err(ProductError::DuplicateSku(new_sku.to_string()));
            }
            sku = new_sku.to_string();
        }

        let mut active: products::ActiveModel = product.into();
        active.sku = Set(sku.clone());
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        if let Some(sale_price) = input.sale_price {
            active.sale_price = Set(sale_price);
        }
        if let Some(reorder_level) = input.reorder_level {
            active.reorder_level = Set(reorder_level);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| ProductError::from_write(e, &sku))
    }

    /// Deletes a product that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `InUse` naming the first kind of reference found.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }
        if let Some(what) = self.first_reference(id).await? {
            return Err(ProductError::InUse(what));
        }

        products::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn first_reference(&self, id: Uuid) -> Result<Option<&'static str>, DbErr> {
        let db = &self.db;
        if purchase_items::Entity::find()
            .filter(purchase_items::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
        {
            return Ok(Some("purchase orders"));
        }
        if sale_items::Entity::find()
            .filter(sale_items::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
        {
            return Ok(Some("sales"));
        }
        if van_sale_items::Entity::find()
            .filter(van_sale_items::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
        {
            return Ok(Some("van sales"));
        }
        if bills_of_materials::Entity::find()
            .filter(bills_of_materials::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
            || bom_components::Entity::find()
                .filter(bom_components::Column::ComponentId.eq(id))
                .one(db)
                .await?
                .is_some()
        {
            return Ok(Some("bills of materials"));
        }
        if production_orders::Entity::find()
            .filter(production_orders::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
        {
            return Ok(Some("production orders"));
        }
        if stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(id))
            .one(db)
            .await?
            .is_some()
        {
            return Ok(Some("stock movements"));
        }
        Ok(None)
    }

    /// Applies a manual stock adjustment and records an `adjustment`
    /// movement, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Stock` for a zero delta or a negative result.
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        input: AdjustStockInput,
        user_id: Option<Uuid>,
    ) -> Result<(products::Model, stock_movements::Model), ProductError> {
        let txn = self.db.begin().await?;

        let mut locked = StockWriter::lock_products(&txn, [id]).await?;
        let product = locked.remove(&id).ok_or(ProductError::NotFound(id))?;
        let position = position_of(&product);
        let after = position.adjust(input.delta)?;

        let source = MovementSource {
            movement_type: MovementType::Adjustment,
            reference_type: None,
            reference_id: None,
            note: Some(input.reason),
            created_by: user_id,
        };
        let result = StockWriter::apply(&txn, product, after, position.unit_cost, &source).await?;

        txn.commit().await?;

        tracing::info!(
            product_id = %id,
            delta = %input.delta,
            balance = %after.on_hand,
            "stock adjusted"
        );
        Ok(result)
    }

    /// Movement history of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn movements(
        &self,
        id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<stock_movements::Model>, ProductError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }
        let query = stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(id))
            .order_by_desc(stock_movements::Column::CreatedAt);
        Ok(fetch_page(&self.db, query, page).await?)
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
