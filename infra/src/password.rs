//! Bcrypt password hasher.

use async_trait::async_trait;
use tokio::task;

use ec_core::errors::DomainError;
use ec_core::services::password::PasswordHasher;

/// Bcrypt-backed password hasher.
///
/// Bcrypt work is CPU-bound at an adaptive cost factor, so both hashing
/// and verification run on the blocking thread pool rather than stalling
/// the async executor. Comparison happens inside bcrypt itself.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the default cost factor (12).
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost factor. Used by tests to
    /// keep hashing fast; production stays at the default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| DomainError::internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| DomainError::internal(format!("bcrypt hash failed: {}", e)))
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError> {
        let plaintext = plaintext.to_string();
        let digest = digest.to_string();
        task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .map_err(|e| DomainError::internal(format!("verification task failed: {}", e)))?
            .map_err(|e| DomainError::internal(format!("bcrypt verify failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hasher = BcryptPasswordHasher::with_cost(4);

        let digest = hasher.hash("secret1").await.unwrap();
        assert_ne!(digest, "secret1");
        assert!(digest.starts_with("$2"));

        assert!(hasher.verify("secret1", &digest).await.unwrap());
        assert!(!hasher.verify("secret2", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        // Salted: two digests of the same input must differ
        let hasher = BcryptPasswordHasher::with_cost(4);
        let a = hasher.hash("secret1").await.unwrap();
        let b = hasher.hash("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_digest_is_an_error_not_a_match() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        assert!(hasher.verify("secret1", "not-a-bcrypt-digest").await.is_err());
    }
}
