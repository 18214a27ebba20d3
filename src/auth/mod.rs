// Password hashing helpers for producing configured hashes

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).context("Failed to hash password")
}

// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify(password, hash).context("Failed to verify password")
}
