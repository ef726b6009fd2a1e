//! Password hashing with bcrypt.

use crate::error::{AuthError, Result};

/// Lowest cost bcrypt accepts. Fast enough for tests.
pub const MIN_COST: u32 = 4;

/// Hashes and verifies passwords.
///
/// The cost is configurable so tests can use [`MIN_COST`].
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost.
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Crypto`] if bcrypt rejects the input.
    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Crypto(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed hash counts as a mismatch.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::new(MIN_COST);
        let hash = hasher.hash("password").unwrap();
        assert_ne!(hash, "password");
        assert!(hasher.verify("password", &hash));
        assert!(!hasher.verify("Password", &hash));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        let hasher = PasswordHasher::new(MIN_COST);
        assert!(!hasher.verify("password", "not-a-bcrypt-hash"));
    }
}
