//! Bearer-token authentication middleware

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::application::AuthService;
use crate::domain::{Account, Role};

/// Authentication state shared by every protected route
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// The caller behind a verified bearer token
#[derive(Clone, Debug)]
pub struct Actor {
    pub account_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.credentials.username.clone(),
            role: account.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Staff and admins may manage the slot inventory
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Verify the bearer token and attach the [`Actor`] to the request.
///
/// Token verification goes through [`AuthService::verify`], so a token
/// of a deactivated account is refused even before it expires.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response("Missing authentication token");
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response("Invalid authentication token");
    };

    match state.auth.verify(token).await {
        Ok(account) => {
            request
                .extensions_mut()
                .insert(Actor::from_account(&account));
            next.run(request).await
        }
        Err(err) => auth_error_response(&err.to_string()),
    }
}

fn auth_error_response(message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (StatusCode::UNAUTHORIZED, body).into_response()
}
