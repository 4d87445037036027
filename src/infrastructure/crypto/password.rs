//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a plaintext password against a stored hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hashed)
}

// ── Tests ──────────────────────────────────────────────────────
