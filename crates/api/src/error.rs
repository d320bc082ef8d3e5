//! HTTP error responses.
//!
//! Every handler returns [`ApiResult`]. Repository and domain errors convert
//! into [`AppError`] first, which fixes the status code and the stable error
//! code; the body is always `{"error": "<CODE>", "message": "<text>"}`.

use std::fmt::Display;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use comptoir_core::auth::PasswordError;
use comptoir_db::repositories::{
    AttendanceError, BomError, ClientError, CommercialError, EmployeeRepoError, ExpenseRepoError,
    PayrollRepoError, ProductError, ProductionError, PurchaseError, SaleError, SupplierError,
    UserError, VanSaleRepoError,
};
use comptoir_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;
use uuid::Uuid;
use validator::ValidationErrors;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] rendered as a JSON response.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }

    /// 404 for a record looked up by ID.
    #[must_use]
    pub fn not_found(what: &str, id: Uuid) -> Self {
        Self(AppError::NotFound(format!("{what} {id} not found")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if error.is_server_error() {
            tracing::error!(error = %error, "request failed");
            "An unexpected error occurred".to_string()
        } else {
            error.message().to_string()
        };
        (
            status,
            Json(json!({ "error": error.error_code(), "message": message })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

fn not_found(error: impl Display) -> ApiError {
    ApiError(AppError::NotFound(error.to_string()))
}

fn rule(error: impl Display) -> ApiError {
    ApiError(AppError::BusinessRule(error.to_string()))
}

fn invalid(error: impl Display) -> ApiError {
    ApiError(AppError::Validation(error.to_string()))
}

fn conflict(error: impl Display) -> ApiError {
    ApiError(AppError::Conflict(error.to_string()))
}

impl From<DbErr> for ApiError {
    fn from(error: DbErr) -> Self {
        Self(AppError::Database(error.to_string()))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        invalid(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        invalid(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        invalid(rejection.body_text())
    }
}

impl From<JwtError> for ApiError {
    fn from(error: JwtError) -> Self {
        match error {
            JwtError::EncodingError(_) => Self(AppError::Internal(error.to_string())),
            JwtError::Expired | JwtError::DecodingError(_) | JwtError::WrongKind => {
                Self(AppError::Unauthorized(error.to_string()))
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::TooWeak => invalid(error),
            _ => Self(AppError::Internal(error.to_string())),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::DuplicateEmail(_) => conflict(error),
            UserError::NotFound(_) => not_found(error),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(_) => not_found(error),
            ProductError::DuplicateSku(_) => conflict(error),
            ProductError::InUse(_) | ProductError::Stock(_) => rule(error),
            ProductError::Database(e) => e.into(),
        }
    }
}

impl From<SupplierError> for ApiError {
    fn from(error: SupplierError) -> Self {
        match error {
            SupplierError::NotFound(_) => not_found(error),
            SupplierError::InUse => rule(error),
            SupplierError::Invalid(_) => invalid(error),
            SupplierError::Database(e) => e.into(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound(_) => not_found(error),
            ClientError::InUse => rule(error),
            ClientError::Invalid(_) => invalid(error),
            ClientError::Database(e) => e.into(),
        }
    }
}

impl From<CommercialError> for ApiError {
    fn from(error: CommercialError) -> Self {
        match error {
            CommercialError::NotFound(_) => not_found(error),
            CommercialError::InUse(_) => rule(error),
            CommercialError::Invalid(_) => invalid(error),
            CommercialError::Database(e) => e.into(),
        }
    }
}

impl From<PurchaseError> for ApiError {
    fn from(error: PurchaseError) -> Self {
        match error {
            PurchaseError::NotFound(_)
            | PurchaseError::SupplierNotFound(_)
            | PurchaseError::ProductNotFound(_) => not_found(error),
            PurchaseError::DuplicateReference(_) => conflict(error),
            PurchaseError::Rule(_) => rule(error),
            PurchaseError::Database(e) => e.into(),
        }
    }
}

impl From<SaleError> for ApiError {
    fn from(error: SaleError) -> Self {
        match error {
            SaleError::NotFound(_)
            | SaleError::ClientNotFound(_)
            | SaleError::CommercialNotFound(_)
            | SaleError::ProductNotFound(_) => not_found(error),
            SaleError::DuplicateReference(_) => conflict(error),
            SaleError::Rule(_) => rule(error),
            SaleError::Database(e) => e.into(),
        }
    }
}

impl From<VanSaleRepoError> for ApiError {
    fn from(error: VanSaleRepoError) -> Self {
        match error {
            VanSaleRepoError::NotFound(_)
            | VanSaleRepoError::CommercialNotFound(_)
            | VanSaleRepoError::ProductNotFound(_) => not_found(error),
            VanSaleRepoError::DuplicateReference(_) => conflict(error),
            VanSaleRepoError::CommercialInactive(_) | VanSaleRepoError::Rule(_) => rule(error),
            VanSaleRepoError::Database(e) => e.into(),
        }
    }
}

impl From<EmployeeRepoError> for ApiError {
    fn from(error: EmployeeRepoError) -> Self {
        match error {
            EmployeeRepoError::NotFound(_) => not_found(error),
            EmployeeRepoError::DuplicateCode(_) => conflict(error),
            EmployeeRepoError::HasPayroll => rule(error),
            EmployeeRepoError::Invalid(_) => invalid(error),
            EmployeeRepoError::Database(e) => e.into(),
        }
    }
}

impl From<AttendanceError> for ApiError {
    fn from(error: AttendanceError) -> Self {
        match error {
            AttendanceError::NotFound(_) | AttendanceError::EmployeeNotFound(_) => {
                not_found(error)
            }
            AttendanceError::DuplicateDay(_) => conflict(error),
            AttendanceError::Invalid(_) => invalid(error),
            AttendanceError::Database(e) => e.into(),
        }
    }
}

impl From<PayrollRepoError> for ApiError {
    fn from(error: PayrollRepoError) -> Self {
        match error {
            PayrollRepoError::NotFound(_) => not_found(error),
            PayrollRepoError::AlreadyGenerated { .. } => conflict(error),
            PayrollRepoError::Rule(_) => rule(error),
            PayrollRepoError::Database(e) => e.into(),
        }
    }
}

impl From<ExpenseRepoError> for ApiError {
    fn from(error: ExpenseRepoError) -> Self {
        match error {
            ExpenseRepoError::NotFound(_) | ExpenseRepoError::SupplierNotFound(_) => {
                not_found(error)
            }
            ExpenseRepoError::Invalid(_) => invalid(error),
            ExpenseRepoError::Database(e) => e.into(),
        }
    }
}

impl From<BomError> for ApiError {
    fn from(error: BomError) -> Self {
        match error {
            BomError::NotFound(_) | BomError::ProductNotFound(_) => not_found(error),
            BomError::InUse | BomError::Rule(_) => rule(error),
            BomError::Database(e) => e.into(),
        }
    }
}

impl From<ProductionError> for ApiError {
    fn from(error: ProductionError) -> Self {
        match error {
            ProductionError::NotFound(_)
            | ProductionError::BomNotFound(_)
            | ProductionError::ProductNotFound(_) => not_found(error),
            ProductionError::DuplicateReference(_) => conflict(error),
            ProductionError::BomInactive(_)
            | ProductionError::NotDeletable
            | ProductionError::Rule(_) => rule(error),
            ProductionError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comptoir_core::inventory::InventoryError;
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_business_rule_is_400() {
        let error: ApiError = ProductError::Stock(InventoryError::InsufficientStock {
            available: dec!(2),
            requested: dec!(5),
        })
        .into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(response).await["error"], "BUSINESS_RULE_VIOLATION");
    }

    #[tokio::test]
    async fn test_duplicate_is_409_and_missing_is_404() {
        let duplicate: ApiError = ProductError::DuplicateSku("SKU-1".into()).into();
        assert_eq!(duplicate.into_response().status(), StatusCode::CONFLICT);

        let missing: ApiError = BomError::NotFound(Uuid::nil()).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_payroll_generated_twice_is_409() {
        let error: ApiError = PayrollRepoError::AlreadyGenerated {
            employee_id: Uuid::nil(),
            period: "2026-09".into(),
        }
        .into();
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let error: ApiError = DbErr::Custom("connection refused".into()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body(response).await;
        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "An unexpected error occurred");
    }
}
