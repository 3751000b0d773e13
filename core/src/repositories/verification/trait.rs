//! Verification code repository trait.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::VerificationCode;
use crate::errors::DomainError;

/// Repository trait for VerificationCode persistence operations.
///
/// # Concurrency
/// `claim` must be linearizable per row: under concurrent claims of the
/// same code, at most one caller may succeed. Implementations use a
/// conditional update on `is_used` with an affected-row check, never a
/// separate read followed by a write.
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Persist a freshly issued code.
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError>;

    /// Atomically claim the most recently created unused, unexpired code
    /// matching `phone` and `code`.
    ///
    /// Returns `None` when no claimable row matches (absent, already used
    /// or expired — callers must not distinguish).
    async fn claim(&self, phone: &str, code: &str)
        -> Result<Option<VerificationCode>, DomainError>;

    /// Count codes created for `phone` within the rolling window ending
    /// now. Used for send-code rate limiting.
    async fn count_recent(&self, phone: &str, window: Duration) -> Result<u32, DomainError>;

    /// Delete used-or-expired rows. Run from the periodic cleanup task,
    /// never on the request path.
    async fn delete_consumed(&self) -> Result<u64, DomainError>;
}
