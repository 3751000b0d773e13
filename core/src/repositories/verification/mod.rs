//! Verification code repository interface and test double.

mod mock;
mod r#trait;

pub use mock::MockVerificationCodeRepository;
pub use r#trait::VerificationCodeRepository;
