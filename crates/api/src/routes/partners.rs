//! Supplier, client and field-commercial routes.
//!
//! The three share a shape: list with search, CRUD, and a delete that is
//! refused (400) once documents reference the record.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use comptoir_db::{
    entities::{clients, commercials, suppliers},
    repositories::{
        ClientRepository, CommercialRepository, ContactDetails, CreateClientInput,
        CreateCommercialInput, CreateSupplierInput, PartnerFilter, SupplierRepository,
        UpdateClientInput, UpdateCommercialInput, UpdateContactDetails, UpdateSupplierInput,
    },
};
use comptoir_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, Query, ValidatedJson, nullable},
    middleware::AuthUser,
    validation::{money, percent},
};

/// Creates the partner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/commercials", get(list_commercials).post(create_commercial))
        .route(
            "/commercials/{id}",
            get(get_commercial)
                .put(update_commercial)
                .delete(delete_commercial),
        )
}

/// Query parameters shared by the partner lists.
#[derive(Debug, Deserialize)]
pub struct ListPartnersQuery {
    /// Matches the name.
    pub search: Option<String>,
    /// Active flag.
    pub active: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ListPartnersQuery {
    fn split(self) -> (PartnerFilter, PageRequest) {
        let page = PageRequest::new(self.page, self.per_page);
        let filter = PartnerFilter {
            search: self.search,
            is_active: self.active,
        };
        (filter, page)
    }
}

/// Contact block of suppliers and clients.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactRequest {
    /// Person to ask for.
    pub contact_name: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free text.
    pub notes: Option<String>,
}

impl From<ContactRequest> for ContactDetails {
    fn from(c: ContactRequest) -> Self {
        Self {
            contact_name: c.contact_name,
            email: c.email,
            phone: c.phone,
            tax_id: c.tax_id,
            address: c.address,
            notes: c.notes,
        }
    }
}

/// Contact changes; `null` clears a field.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    /// Person to ask for.
    #[serde(default, deserialize_with = "nullable")]
    pub contact_name: Option<Option<String>>,
    /// Email.
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email)]
    pub email: Option<Option<String>>,
    /// Phone.
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    /// Tax identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub tax_id: Option<Option<String>>,
    /// Postal address.
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    /// Free text.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl From<UpdateContactRequest> for UpdateContactDetails {
    fn from(c: UpdateContactRequest) -> Self {
        Self {
            contact_name: c.contact_name,
            email: c.email,
            phone: c.phone,
            tax_id: c.tax_id,
            address: c.address,
            notes: c.notes,
        }
    }
}

/// Request body for creating a supplier.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    /// Company name.
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    /// Contact block.
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: ContactRequest,
}

/// Request body for updating a supplier.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    /// Company name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Contact block.
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: UpdateContactRequest,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Request body for creating a client.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// Client name.
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    /// Contact block.
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: ContactRequest,
    /// Credit allowed to the client.
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub credit_limit: Decimal,
}

/// Request body for updating a client.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    /// Client name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Contact block.
    #[serde(flatten)]
    #[validate(nested)]
    pub contact: UpdateContactRequest,
    /// Credit allowed to the client.
    #[validate(custom(function = "money"))]
    pub credit_limit: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Request body for creating a commercial.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommercialRequest {
    /// Full name.
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Plate of the van driven.
    pub vehicle_plate: Option<String>,
    /// Commission on sales, in percent.
    #[serde(default)]
    #[validate(custom(function = "percent"))]
    pub commission_rate: Decimal,
}

/// Request body for updating a commercial.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommercialRequest {
    /// Full name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Phone.
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    /// Email.
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email)]
    pub email: Option<Option<String>>,
    /// Plate of the van driven.
    #[serde(default, deserialize_with = "nullable")]
    pub vehicle_plate: Option<Option<String>>,
    /// Commission on sales, in percent.
    #[validate(custom(function = "percent"))]
    pub commission_rate: Option<Decimal>,
    /// Active flag.
    pub is_active: Option<bool>,
}

async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> ApiResult<Json<PageResponse<suppliers::Model>>> {
    let (filter, page) = query.split();
    Ok(Json(
        SupplierRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSupplierRequest>,
) -> ApiResult<(StatusCode, Json<suppliers::Model>)> {
    let supplier = SupplierRepository::new(state.conn())
        .create(CreateSupplierInput {
            name: payload.name,
            contact: payload.contact.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<suppliers::Model>> {
    SupplierRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Supplier", id))
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSupplierRequest>,
) -> ApiResult<Json<suppliers::Model>> {
    let supplier = SupplierRepository::new(state.conn())
        .update(
            id,
            UpdateSupplierInput {
                name: payload.name,
                contact: payload.contact.into(),
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(supplier))
}

async fn delete_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    SupplierRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> ApiResult<Json<PageResponse<clients::Model>>> {
    let (filter, page) = query.split();
    Ok(Json(
        ClientRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<clients::Model>)> {
    let client = ClientRepository::new(state.conn())
        .create(CreateClientInput {
            name: payload.name,
            contact: payload.contact.into(),
            credit_limit: payload.credit_limit,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<clients::Model>> {
    ClientRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client", id))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateClientRequest>,
) -> ApiResult<Json<clients::Model>> {
    let client = ClientRepository::new(state.conn())
        .update(
            id,
            UpdateClientInput {
                name: payload.name,
                contact: payload.contact.into(),
                credit_limit: payload.credit_limit,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(client))
}

async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    ClientRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_commercials(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> ApiResult<Json<PageResponse<commercials::Model>>> {
    let (filter, page) = query.split();
    Ok(Json(
        CommercialRepository::new(state.conn())
            .list(&filter, &page)
            .await?,
    ))
}

async fn create_commercial(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCommercialRequest>,
) -> ApiResult<(StatusCode, Json<commercials::Model>)> {
    let commercial = CommercialRepository::new(state.conn())
        .create(CreateCommercialInput {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            vehicle_plate: payload.vehicle_plate,
            commission_rate: payload.commission_rate,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(commercial)))
}

async fn get_commercial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<commercials::Model>> {
    CommercialRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Commercial", id))
}

async fn update_commercial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCommercialRequest>,
) -> ApiResult<Json<commercials::Model>> {
    let commercial = CommercialRepository::new(state.conn())
        .update(
            id,
            UpdateCommercialInput {
                name: payload.name,
                phone: payload.phone,
                email: payload.email,
                vehicle_plate: payload.vehicle_plate,
                commission_rate: payload.commission_rate,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(commercial))
}

async fn delete_commercial(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.require_manager()?;
    CommercialRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
