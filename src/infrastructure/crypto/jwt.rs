//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Issuer claim
    pub issuer: String,
}

/// Claims carried inside an issued token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// Account role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(account_id: &str, username: &str, role: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(config.expiration_minutes);

        Self {
            sub: account_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role == "ADMIN"
    }
}

/// Sign a token for an account
pub fn create_token(
    account_id: &str,
    username: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(account_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, issuer and expiry, returning the decoded claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_minutes: 30,
            issuer: "parking-service".to_string(),
        }
    }

    #[test]
    fn token_round_trip() {
        let config = test_config();
        let token = create_token("account-1", "budi", "USER", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.username, "budi");
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.iss, "parking-service");
        assert!(!claims.is_expired());
        assert!(!claims.is_admin());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config();
        let token = create_token("account-1", "budi", "USER", &config).unwrap();

        let other = JwtConfig {
            secret: "other-secret".to_string(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut config = test_config();
        let token = create_token("account-1", "budi", "ADMIN", &config).unwrap();

        config.issuer = "someone-else".to_string();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn admin_role_is_detected() {
        let config = test_config();
        let claims = TokenClaims::new("id", "root", "ADMIN", &config);
        assert!(claims.is_admin());
    }
}
