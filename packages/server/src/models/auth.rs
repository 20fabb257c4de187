use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::validate_text;
use crate::error::AppError;
use crate::extractors::json::Validate;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, alphanumeric and underscores).
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Display name (1-128 characters).
    #[schema(example = "Alice Wonder")]
    pub name: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > 32 {
            return Err(AppError::Validation(
                "Username must be 1-32 characters".into(),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Validation(
                "Username must contain only letters, digits, and underscores".into(),
            ));
        }
        if self.password.len() < 8 || self.password.len() > 128 {
            return Err(AppError::Validation(
                "Password must be 8-128 characters".into(),
            ));
        }
        validate_text(&self.name, "Name", 128)
    }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the account to log into.
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".into()));
        }
        Ok(())
    }
}

/// Public view of a user account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    /// User ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    #[schema(example = "alice_wonder")]
    pub username: String,
    #[schema(example = "Alice Wonder")]
    pub name: String,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}
