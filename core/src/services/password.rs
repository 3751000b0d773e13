//! Password hashing collaborator interface.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Salted, slow-by-design password hashing.
///
/// Hashing is CPU-bound; implementations must run the work off the async
/// executor (see the bcrypt implementation in the infrastructure crate).
/// `verify` performs the comparison inside the hashing library, which is
/// resistant to timing analysis.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a storable digest.
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored digest.
    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError>;
}
