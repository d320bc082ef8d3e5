//! Commercial (field sales representative) repository.

use comptoir_core::partners::{PartnerError, normalize_name, validate_commission_rate};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::common::fetch_page;
use super::supplier::PartnerFilter;
use crate::entities::{commercials, sales, van_sales};

/// Error types for commercial operations.
#[derive(Debug, thiserror::Error)]
pub enum CommercialError {
    /// Commercial not found.
    #[error("Commercial not found: {0}")]
    NotFound(Uuid),

    /// Commercial has sales or van sales.
    #[error("Cannot delete commercial: it is referenced by {0}")]
    InUse(&'static str),

    /// Invalid field.
    #[error(transparent)]
    Invalid(#[from] PartnerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a commercial.
#[derive(Debug, Clone)]
pub struct CreateCommercialInput {
    /// Full name.
    pub name: String,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Registration plate of the van.
    pub vehicle_plate: Option<String>,
    /// Commission in percent (0-100).
    pub commission_rate: Decimal,
}

/// Input for updating a commercial.
#[derive(Debug, Clone, Default)]
pub struct UpdateCommercialInput {
    /// Full name.
    pub name: Option<String>,
    /// Phone.
    pub phone: Option<Option<String>>,
    /// Email.
    pub email: Option<Option<String>>,
    /// Registration plate.
    pub vehicle_plate: Option<Option<String>>,
    /// Commission rate.
    pub commission_rate: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Commercial repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CommercialRepository {
    db: DatabaseConnection,
}

impl CommercialRepository {
    /// Creates a new commercial repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a commercial.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for an empty name or a rate outside 0-100.
    pub async fn create(
        &self,
        input: CreateCommercialInput,
    ) -> Result<commercials::Model, CommercialError> {
        let name = normalize_name(&input.name)?;
        validate_commission_rate(input.commission_rate)?;
        let now = chrono::Utc::now().into();

        let commercial = commercials::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            phone: Set(input.phone),
            email: Set(input.email),
            vehicle_plate: Set(input.vehicle_plate),
            commission_rate: Set(input.commission_rate),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(commercial.insert(&self.db).await?)
    }

    /// Finds a commercial by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<commercials::Model>, DbErr> {
        commercials::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists commercials by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PartnerFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<commercials::Model>, DbErr> {
        let mut query = commercials::Entity::find();
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(commercials::Column::Name.contains(search));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(commercials::Column::IsActive.eq(is_active));
        }
        fetch_page(&self.db, query.order_by_asc(commercials::Column::Name), page).await
    }

    /// Updates a commercial.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Invalid`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCommercialInput,
    ) -> Result<commercials::Model, CommercialError> {
        let commercial = self
            .find_by_id(id)
            .await?
            .ok_or(CommercialError::NotFound(id))?;

        let mut active: commercials::ActiveModel = commercial.into();
        if let Some(name) = input.name {
            active.name = Set(normalize_name(&name)?);
        }
        if let Some(rate) = input.commission_rate {
            validate_commission_rate(rate)?;
            active.commission_rate = Set(rate);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(plate) = input.vehicle_plate {
            active.vehicle_plate = Set(plate);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a commercial without sales or van sales.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: Uuid) -> Result<(), CommercialError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(CommercialError::NotFound(id));
        }
        if van_sales::Entity::find()
            .filter(van_sales::Column::CommercialId.eq(id))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(CommercialError::InUse("van sales"));
        }
        if sales::Entity::find()
            .filter(sales::Column::CommercialId.eq(id))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(CommercialError::InUse("sales"));
        }

        commercials::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(commercial_id = %id, "commercial deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "commercial_tests.rs"]
mod tests;
