//! Domain entities.

pub mod token;
pub mod user;
pub mod verification_code;

pub use token::{AccessClaims, IssuedToken, RefreshClaims, RefreshToken, TokenPair};
pub use user::{User, UserRole};
pub use verification_code::VerificationCode;
