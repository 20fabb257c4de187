use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Create a user account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        id: Set(Uuid::now_v7()),
        username: Set(payload.username.trim().to_string()),
        password: Set(hash),
        name: Set(payload.name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
    };

    let user = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UsernameTaken,
        _ => AppError::from(e),
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Exchange credentials for a bearer token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(user.id, &user.username, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Token holder", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, username = %auth_user.username))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
