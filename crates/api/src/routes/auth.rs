//! Registration, login, token refresh and user administration.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use comptoir_core::auth::{
    UserRole as CoreRole, hash_password, validate_password_strength, verify_password,
};
use comptoir_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::CreateUserInput,
};
use comptoir_shared::{
    AppError,
    auth::{LoginResponse, TokenKind, UserInfo},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{Path, ValidatedJson},
    middleware::AuthUser,
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Auth routes that need a valid access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/users", get(list_users))
        .route("/users/{id}/role", put(change_role))
}

/// Request body for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "full name is required"))]
    pub full_name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    /// A refresh token from a previous login.
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for a role change.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    /// New role.
    pub role: UserRole,
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: CoreRole::from(user.role).as_str().to_string(),
    }
}

fn issue_tokens(state: &AppState, user: &users::Model) -> ApiResult<LoginResponse> {
    let info = user_info(user);
    let tokens = state.jwt_service.generate_pair(user.id, &info.role)?;
    Ok(LoginResponse { user: info, tokens })
}

fn invalid_credentials() -> ApiError {
    ApiError(AppError::Unauthorized("Invalid email or password".into()))
}

/// POST /auth/register - Create an account. The first account is an admin.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    validate_password_strength(&payload.password)?;
    let password_hash = hash_password(&payload.password)?;

    let user = UserRepository::new(state.conn())
        .create(CreateUserInput {
            email: payload.email,
            password_hash,
            full_name: payload.full_name.trim().to_string(),
            role: UserRole::Staff,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(issue_tokens(&state, &user)?)))
}

/// POST /auth/login - Exchange credentials for a token pair.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.conn());
    let Some(user) = repo.find_by_email(&payload.email).await? else {
        info!(email = %payload.email, "login attempt for unknown user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(ApiError(AppError::Unauthorized(
            "This account has been disabled".into(),
        )));
    }
    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "failed login attempt");
        return Err(invalid_credentials());
    }

    let user = repo.touch_last_login(user).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(issue_tokens(&state, &user)?))
}

/// POST /auth/refresh - Trade a refresh token for a fresh pair.
///
/// The role is re-read from the database so that role changes take effect
/// at the next refresh.
async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)?;

    let user = UserRepository::new(state.conn())
        .find_by_id(claims.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError(AppError::Unauthorized("Account no longer active".into())))?;

    Ok(Json(issue_tokens(&state, &user)?))
}

/// GET /auth/me - The authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new(state.conn())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User", auth.user_id()))?;
    Ok(Json(user_info(&user)))
}

/// GET /users - All accounts (admin).
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<UserInfo>>> {
    auth.require_admin()?;
    let users = UserRepository::new(state.conn()).list().await?;
    Ok(Json(users.iter().map(user_info).collect()))
}

/// PUT /users/{id}/role - Change a user's role (admin).
async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<UserInfo>> {
    auth.require_admin()?;
    if id == auth.user_id() && payload.role != UserRole::Admin {
        return Err(ApiError(AppError::BusinessRule(
            "An admin cannot demote themselves".into(),
        )));
    }

    let user = UserRepository::new(state.conn())
        .update_role(id, payload.role)
        .await?;
    info!(user_id = %id, role = %CoreRole::from(user.role), changed_by = %auth.user_id(), "user role changed");
    Ok(Json(user_info(&user)))
}
