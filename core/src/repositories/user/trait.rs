//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations.
///
/// The phone number carries a unique constraint; `create` must fail rather
/// than silently overwrite when the phone is already registered.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by their phone number.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist changes to an existing user.
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user.
    ///
    /// Returns `false` when no such user existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
