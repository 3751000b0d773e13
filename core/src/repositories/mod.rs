//! Repository interfaces for entity persistence.
//!
//! Concrete implementations live in the infrastructure crate; in-memory
//! mocks are provided here for tests.

pub mod token;
pub mod user;
pub mod verification;

pub use token::{MockRefreshTokenRepository, RefreshTokenRepository};
pub use user::{MockUserRepository, UserRepository};
pub use verification::{MockVerificationCodeRepository, VerificationCodeRepository};
