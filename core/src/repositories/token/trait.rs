//! Refresh token repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations.
///
/// Tokens are stored as SHA-256 hashes; every lookup and revocation takes
/// the hash, never the raw token.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a newly issued refresh token.
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a token that is neither revoked nor expired.
    ///
    /// This is a second expiry check independent of the JWT signature:
    /// it catches tokens revoked before their cryptographic expiry.
    async fn find_valid(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Revoke a token. Idempotent: succeeds as a no-op when the token is
    /// absent or already revoked, so logout never fails visibly.
    async fn revoke(&self, token_hash: &str) -> Result<(), DomainError>;

    /// Revoke every token belonging to a user. Used by single-device-mode
    /// login and by role/suspension security actions.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Delete revoked-or-expired rows. Run from the periodic cleanup task.
    async fn delete_consumed(&self) -> Result<u64, DomainError>;
}
