//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use super::dto::{AccountInfo, LoginRequest, LoginResponse, MeResponse, RegisterRequest};
use crate::application::AuthService;
use crate::domain::Role;
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::Actor;
use crate::interfaces::http::modules::users::dto::UserView;

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountInfo>),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountInfo>>), ApiError> {
    let role = match request.role.as_deref() {
        Some(s) => Role::parse(s).map_err(domain_error_response)?,
        None => Role::User,
    };

    let (account, _user) = state
        .auth
        .register(
            &request.username,
            &request.password,
            &request.name,
            request.email,
            role,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountInfo::from(&account))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or inactive account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let (account, token) = state
        .auth
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error_response)?;

    let response = LoginResponse {
        access_token: token.token,
        token_type: token.token_type,
        expires_in: (token.expires_at - Utc::now()).num_seconds().max(0),
        account: AccountInfo::from(&account),
    };

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ApiResponse<MeResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_current_account(
    State(state): State<AuthHandlerState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let account = state
        .auth
        .account(actor.account_id)
        .await
        .map_err(domain_error_response)?;
    let profile = state
        .auth
        .profile(actor.account_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(MeResponse {
        account: AccountInfo::from(&account),
        profile: profile.map(UserView::from),
    })))
}
