//! Verification code entity for SMS-based authentication.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (2 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 2;

/// Verification code entity for SMS-based authentication.
///
/// Multiple outstanding codes may exist for one phone; claiming always
/// selects the most recently created valid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique identifier for the verification code
    pub id: Uuid,

    /// Phone number this code was sent to
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully used
    pub is_used: bool,
}

impl VerificationCode {
    /// Creates a new verification code with a random 6-digit code and the
    /// default expiration.
    pub fn new(phone: String) -> Self {
        Self::new_with_expiration(phone, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Creates a new verification code with a custom expiration time.
    pub fn new_with_expiration(phone: String, expiration_minutes: i64) -> Self {
        let code = Self::generate_code();
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            phone,
            code,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
            is_used: false,
        }
    }

    /// Generates a uniformly random 6-digit code, leading zeros allowed.
    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Checks if the verification code has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A code is claimable while it is unused and unexpired.
    pub fn is_claimable(&self) -> bool {
        !self.is_used && !self.is_expired()
    }

    /// Marks the code as consumed.
    pub fn mark_used(&mut self) {
        self.is_used = true;
    }
}
