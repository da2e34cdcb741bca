//! Authentication request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInDto {
    #[validate(length(min = 1))]
    #[schema(example = "john_doe")]
    pub username_or_email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpDto {
    #[validate(length(min = 3, max = 50))]
    #[schema(example = "john_doe")]
    pub username: String,
    #[validate(email)]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Body of `/auth/refresh`. The `refreshToken` cookie takes precedence.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenDto {
    pub refresh_token: Option<String>,
}

/// Returned by sign-in, sign-up, and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp
    pub access_token_expired_at: i64,
    /// Unix timestamp
    pub refresh_token_expired_at: i64,
    pub user: User,
}
