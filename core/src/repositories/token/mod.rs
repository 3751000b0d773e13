//! Refresh token repository interface and test double.

mod mock;
mod r#trait;

pub use mock::MockRefreshTokenRepository;
pub use r#trait::RefreshTokenRepository;
