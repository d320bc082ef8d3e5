//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use comptoir_core::auth::UserRole;
use comptoir_shared::{AppError, Claims, auth::TokenKind};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Authentication middleware that validates JWT access tokens.
///
/// The claims are stored in the request extensions for [`AuthUser`].
/// Refresh tokens are refused here; they are only good for `/auth/refresh`.
///
/// # Errors
///
/// Returns 401 when the header is missing or the token is invalid, expired
/// or of the wrong kind.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(ApiError(AppError::Unauthorized(
            "Authorization header with Bearer token is required".into(),
        )));
    };

    let claims = state
        .jwt_service
        .validate_kind(bearer.token(), TokenKind::Access)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// The role carried by the token. Unknown strings fall back to staff.
    #[must_use]
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.0.role).unwrap_or(UserRole::Staff)
    }

    /// Requires a role allowed to delete records.
    ///
    /// # Errors
    ///
    /// Returns 403 for staff.
    pub fn require_manager(&self) -> Result<(), ApiError> {
        if self.role().can_delete_records() {
            Ok(())
        } else {
            Err(forbidden("manager or admin role required"))
        }
    }

    /// Requires a role allowed to generate, adjust and pay payroll.
    ///
    /// # Errors
    ///
    /// Returns 403 for staff.
    pub fn require_payroll_manager(&self) -> Result<(), ApiError> {
        if self.role().can_manage_payroll() {
            Ok(())
        } else {
            Err(forbidden("payroll requires a manager or admin role"))
        }
    }

    /// Requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns 403 for anyone but an admin.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role().can_manage_users() {
            Ok(())
        } else {
            Err(forbidden("admin role required"))
        }
    }
}

fn forbidden(message: &str) -> ApiError {
    ApiError(AppError::Forbidden(message.to_string()))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".into())))
    }
}
