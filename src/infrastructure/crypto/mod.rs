//! Cryptographic utilities: JWT tokens and password hashing

pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
