//! Login account domain entity
//!
//! An `Account` is a login identity with a role, distinct from a `User`
//! (which holds vehicles and payment methods).

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
            Self::User => "USER",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "STAFF" => Ok(Self::Staff),
            "USER" => Ok(Self::User),
            _ => Err(DomainError::Validation(format!("unknown role: {}", s))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username / password-hash pair; both must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> DomainResult<Self> {
        let username = username.into();
        let password_hash = password_hash.into();
        if username.trim().is_empty() {
            return Err(DomainError::Validation(
                "username must not be empty".to_string(),
            ));
        }
        if password_hash.is_empty() {
            return Err(DomainError::Validation(
                "password hash must not be empty".to_string(),
            ));
        }
        Ok(Self {
            username,
            password_hash,
        })
    }
}

/// Issued bearer token with its own expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Login account. Holds at most one live token; issuing a new one
/// silently replaces the previous (no multi-session support).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub credentials: Credentials,
    pub role: Role,
    pub email: Option<String>,
    pub is_active: bool,
    pub current_token: Option<AccessToken>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn create(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        email: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            credentials: Credentials::new(username, password_hash)?,
            role,
            email,
            is_active: true,
            current_token: None,
            created_at: Utc::now(),
        })
    }

    pub fn issue_token(&mut self, token: impl Into<String>, ttl_minutes: i64) -> AccessToken {
        let access_token = AccessToken {
            token: token.into(),
            expires_at: Utc::now() + Duration::minutes(ttl_minutes),
            token_type: "bearer".to_string(),
        };
        self.current_token = Some(access_token.clone());
        access_token
    }

    pub fn revoke_token(&mut self) {
        self.current_token = None;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.revoke_token();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account::create("operator", "$2b$12$hash", Role::Staff, None).unwrap()
    }

    #[test]
    fn create_defaults() {
        let account = sample_account();
        assert!(account.is_active);
        assert!(account.current_token.is_none());
        assert_eq!(account.role, Role::Staff);
        assert!(!account.is_admin());
    }

    #[test]
    fn empty_username_is_rejected() {
        assert!(Credentials::new("  ", "hash").is_err());
    }

    #[test]
    fn empty_password_hash_is_rejected() {
        assert!(Credentials::new("operator", "").is_err());
    }

    #[test]
    fn issue_token_replaces_previous_one() {
        let mut account = sample_account();
        account.issue_token("token-1", 30);
        account.issue_token("token-2", 30);

        let token = account.current_token.as_ref().unwrap();
        assert_eq!(token.token, "token-2");
        assert_eq!(token.token_type, "bearer");
        assert!(!token.is_expired());
    }

    #[test]
    fn expired_token_is_detected() {
        let mut account = sample_account();
        let token = account.issue_token("old", -1);
        assert!(token.is_expired());
    }

    #[test]
    fn deactivate_revokes_token() {
        let mut account = sample_account();
        account.issue_token("token", 30);
        account.deactivate();
        assert!(!account.is_active);
        assert!(account.current_token.is_none());
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("STAFF").unwrap(), Role::Staff);
        assert!(Role::parse("superuser").is_err());
    }
}
