//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::Account;
use crate::interfaces::http::modules::users::dto::UserView;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    /// ADMIN, STAFF or USER; defaults to USER
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub account: AccountInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountInfo {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub email: Option<String>,
    pub is_active: bool,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.credentials.username.clone(),
            role: account.role.as_str().to_string(),
            email: account.email.clone(),
            is_active: account.is_active,
        }
    }
}

/// Current account with its linked profile, if any
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub account: AccountInfo,
    pub profile: Option<UserView>,
}
