//! Password hashing with bcrypt.

use crate::error::CoreResult;

/// Minimum cost bcrypt accepts; handy for tests
pub const MIN_COST: u32 = 4;

pub use bcrypt::DEFAULT_COST;

/// Hash a plaintext password at the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> CoreResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a plaintext password against a stored hash.
///
/// A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
