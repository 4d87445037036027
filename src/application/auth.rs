//! Authentication service: registration, login and token verification

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{AccessToken, Account, DomainError, DomainResult, Role, User};
use crate::infrastructure::crypto::{self, JwtConfig};
use crate::infrastructure::storage::Storage;

/// Single message for both unknown-username and wrong-password, so a
/// caller cannot probe which usernames exist.
const CREDENTIALS_MESSAGE: &str = "username or password incorrect";

/// Service for account registration and login
pub struct AuthService {
    storage: Arc<dyn Storage>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, jwt: JwtConfig) -> Self {
        Self { storage, jwt }
    }

    /// Register a new account with its linked user profile.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        name: &str,
        email: Option<String>,
        role: Role,
    ) -> DomainResult<(Account, User)> {
        if password.is_empty() {
            return Err(DomainError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        if self.storage.username_exists(username).await? {
            return Err(DomainError::Conflict(format!(
                "username {} is already taken",
                username
            )));
        }

        let password_hash = crypto::hash_password(password)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {}", e)))?;
        let account = Account::create(username, password_hash, role, email.clone())?;
        // Build the profile before persisting anything, so a rejected name
        // cannot leave a half-registered account holding the username
        let user = User::create(name, email, Some(account.id))?;

        self.storage.save_account(account.clone()).await?;
        self.storage.save_user(user.clone()).await?;

        info!(account_id = %account.id, username = username, role = %account.role, "account registered");
        Ok((account, user))
    }

    /// Authenticate and issue a fresh token, replacing any previous one.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<(Account, AccessToken)> {
        let mut account = self
            .storage
            .get_account_by_username(username)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(CREDENTIALS_MESSAGE.to_string()))?;

        let matches = crypto::verify_password(password, &account.credentials.password_hash)
            .map_err(|e| DomainError::Internal(format!("password verification failed: {}", e)))?;
        if !matches {
            return Err(DomainError::Unauthorized(CREDENTIALS_MESSAGE.to_string()));
        }
        if !account.is_active {
            return Err(DomainError::Unauthorized(
                "account is not active".to_string(),
            ));
        }

        let token = crypto::create_token(
            &account.id.to_string(),
            &account.credentials.username,
            account.role.as_str(),
            &self.jwt,
        )
        .map_err(|e| DomainError::Internal(format!("token signing failed: {}", e)))?;
        let access_token = account.issue_token(token, self.jwt.expiration_minutes);
        self.storage.update_account(account.clone()).await?;

        info!(account_id = %account.id, username = username, "login succeeded");
        Ok((account, access_token))
    }

    /// Resolve a bearer token back to its active account.
    pub async fn verify(&self, token: &str) -> DomainResult<Account> {
        let claims = crypto::verify_token(token, &self.jwt)
            .map_err(|_| DomainError::Unauthorized("invalid or expired token".to_string()))?;

        let account_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| DomainError::Unauthorized("invalid or expired token".to_string()))?;
        let account = self
            .storage
            .get_account(account_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid or expired token".to_string()))?;

        if !account.is_active {
            return Err(DomainError::Unauthorized(
                "account is not active".to_string(),
            ));
        }
        Ok(account)
    }

    pub async fn account(&self, account_id: Uuid) -> DomainResult<Account> {
        self.storage
            .get_account(account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("account", account_id))
    }

    /// Profile linked to an account, if one was created at registration.
    pub async fn profile(&self, account_id: Uuid) -> DomainResult<Option<User>> {
        self.storage.get_user_by_account(account_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
