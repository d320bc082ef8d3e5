//! Supplier repository.

use comptoir_core::partners::{PartnerError, normalize_name};
use comptoir_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::common::fetch_page;
use crate::entities::{purchases, suppliers};

/// Error types for supplier operations.
#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    NotFound(Uuid),

    /// Supplier has purchase orders.
    #[error("Cannot delete supplier: it has purchase orders")]
    InUse,

    /// Invalid field.
    #[error(transparent)]
    Invalid(#[from] PartnerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Contact fields shared by suppliers and clients.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    /// Person to ask for.
    pub contact_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Tax identification number.
    pub tax_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Partial update of contact fields; `Some(None)` clears a field.
#[derive(Debug, Clone, Default)]
pub struct UpdateContactDetails {
    /// Person to ask for.
    pub contact_name: Option<Option<String>>,
    /// Email.
    pub email: Option<Option<String>>,
    /// Phone.
    pub phone: Option<Option<String>>,
    /// Tax identification number.
    pub tax_id: Option<Option<String>>,
    /// Postal address.
    pub address: Option<Option<String>>,
    /// Notes.
    pub notes: Option<Option<String>>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    /// Company name.
    pub name: String,
    /// Contact fields.
    pub contact: ContactDetails,
}

/// Input for updating a supplier.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    /// Company name.
    pub name: Option<String>,
    /// Contact fields.
    pub contact: UpdateContactDetails,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Filter options shared by the partner lists.
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    /// Substring of the name.
    pub search: Option<String>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Supplier repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for an empty name.
    pub async fn create(
        &self,
        input: CreateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let name = normalize_name(&input.name)?;
        let now = chrono::Utc::now().into();
        let contact = input.contact;

        let supplier = suppliers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            contact_name: Set(contact.contact_name),
            email: Set(contact.email),
            phone: Set(contact.phone),
            tax_id: Set(contact.tax_id),
            address: Set(contact.address),
            notes: Set(contact.notes),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(supplier.insert(&self.db).await?)
    }

    /// Finds a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<suppliers::Model>, DbErr> {
        suppliers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists suppliers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PartnerFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<suppliers::Model>, DbErr> {
        let mut query = suppliers::Entity::find();
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(suppliers::Column::Name.contains(search));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(suppliers::Column::IsActive.eq(is_active));
        }
        fetch_page(&self.db, query.order_by_asc(suppliers::Column::Name), page).await
    }

    /// Updates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Invalid`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let supplier = self
            .find_by_id(id)
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        let mut active: suppliers::ActiveModel = supplier.into();
        if let Some(name) = input.name {
            active.name = Set(normalize_name(&name)?);
        }
        let contact = input.contact;
        if let Some(v) = contact.contact_name {
            active.contact_name = Set(v);
        }
        if let Some(v) = contact.email {
            active.email = Set(v);
        }
        if let Some(v) = contact.phone {
            active.phone = Set(v);
        }
        if let Some(v) = contact.tax_id {
            active.tax_id = Set(v);
        }
        if let Some(v) = contact.address {
            active.address = Set(v);
        }
        if let Some(v) = contact.notes {
            active.notes = Set(v);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a supplier without purchase orders.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: Uuid) -> Result<(), SupplierError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(SupplierError::NotFound(id));
        }
        let referenced = purchases::Entity::find()
            .filter(purchases::Column::SupplierId.eq(id))
            .one(&self.db)
            .await?
            .is_some();
        if referenced {
            return Err(SupplierError::InUse);
        }

        suppliers::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(supplier_id = %id, "supplier deleted");
        Ok(())
    }
}
