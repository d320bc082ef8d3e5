//! Client repository.

use comptoir_core::partners::{PartnerError, normalize_name, validate_credit_limit};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::common::fetch_page;
use super::supplier::{ContactDetails, PartnerFilter, UpdateContactDetails};
use crate::entities::{clients, sales};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Client has sales.
    #[error("Cannot delete client: it has sales")]
    InUse,

    /// Invalid field.
    #[error(transparent)]
    Invalid(#[from] PartnerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Client name.
    pub name: String,
    /// Contact fields.
    pub contact: ContactDetails,
    /// Maximum outstanding balance allowed.
    pub credit_limit: Decimal,
}

/// Input for updating a client.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// Client name.
    pub name: Option<String>,
    /// Contact fields.
    pub contact: UpdateContactDetails,
    /// Credit limit.
    pub credit_limit: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for an empty name or a negative credit limit.
    pub async fn create(&self, input: CreateClientInput) -> Result<clients::Model, ClientError> {
        let name = normalize_name(&input.name)?;
        validate_credit_limit(input.credit_limit)?;
        let now = chrono::Utc::now().into();
        let contact = input.contact;

        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            contact_name: Set(contact.contact_name),
            email: Set(contact.email),
            phone: Set(contact.phone),
            tax_id: Set(contact.tax_id),
            address: Set(contact.address),
            notes: Set(contact.notes),
            credit_limit: Set(input.credit_limit),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(client.insert(&self.db).await?)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists clients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PartnerFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<clients::Model>, DbErr> {
        let mut query = clients::Entity::find();
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(clients::Column::Name.contains(search));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(clients::Column::IsActive.eq(is_active));
        }
        fetch_page(&self.db, query.order_by_asc(clients::Column::Name), page).await
    }

    /// Updates a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Invalid`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let mut active: clients::ActiveModel = client.into();
        if let Some(name) = input.name {
            active.name = Set(normalize_name(&name)?);
        }
        if let Some(limit) = input.credit_limit {
            validate_credit_limit(limit)?;
            active.credit_limit = Set(limit);
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

    /// Deletes a client without sales.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(ClientError::NotFound(id));
        }
        let referenced = sales::Entity::find()
            .filter(sales::Column::ClientId.eq(id))
            .one(&self.db)
            .await?
            .is_some();
        if referenced {
            return Err(ClientError::InUse);
        }

        clients::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(client_id = %id, "client deleted");
        Ok(())
    }
}
