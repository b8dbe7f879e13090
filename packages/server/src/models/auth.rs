use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique email address.
    #[schema(example = "a@x.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "pw123456")]
    pub password: String,
    /// Unique display name (1-32 chars, letters, digits, underscores, hyphens).
    #[schema(example = "alice")]
    pub nickname: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    // Deliberately loose: one '@' with something on both sides, no whitespace.
    let well_formed = email.chars().filter(|&c| c == '@').count() == 1
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.chars().any(char::is_whitespace);
    if email.is_empty() || email.chars().count() > 254 || !well_formed {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    let nickname = payload.nickname.trim();
    if nickname.is_empty() || nickname.chars().count() > 32 {
        return Err(AppError::Validation(
            "Nickname must be 1-32 characters".into(),
        ));
    }
    if !nickname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Nickname must contain only letters, digits, underscores, and hyphens".into(),
        ));
    }

    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "pw123456")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created user.
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub nickname: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token. Valid until natural expiry; there is no refresh flow.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub nickname: String,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub nickname: String,
}
