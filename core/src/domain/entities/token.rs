//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims carried by an access token.
///
/// Role and identity data are embedded so handlers can authorize without a
/// second lookup; suspension is deliberately *not* trusted from the token
/// and is re-checked against the database on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Phone number of the account
    pub phone: String,

    /// Display name, if set
    pub name: Option<String>,

    /// Role, uppercase storage representation
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID
    pub jti: String,

    /// Issuer
    pub iss: String,
}

impl AccessClaims {
    /// Gets the user ID from the claims.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims carried by a refresh token: identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID
    pub jti: String,

    /// Issuer
    pub iss: String,
}

impl RefreshClaims {
    /// Gets the user ID from the claims.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// A freshly signed token together with its absolute expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed JWT string
    pub token: String,

    /// Absolute expiry, for persistence and response bodies
    pub expires_at: DateTime<Utc>,
}

/// Refresh token record stored in the database.
///
/// Only the SHA-256 hash of the signed token is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 hex digest of the signed token
    pub token_hash: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub is_revoked: bool,
}

impl RefreshToken {
    /// Creates a new refresh token record.
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: Utc::now(),
            expires_at,
            is_revoked: false,
        }
    }

    /// Checks if the refresh token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A token is usable while it is neither revoked nor expired.
    pub fn is_usable(&self) -> bool {
        !self.is_revoked && !self.is_expired()
    }

    /// Revokes the refresh token.
    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }
}

/// Token pair returned to the client on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// SHA-256 hex digest of a token string, as stored in `refresh_tokens`.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_refresh_token_is_usable() {
        let token = RefreshToken::new(
            Uuid::new_v4(),
            hash_token("some.jwt.value"),
            Utc::now() + Duration::days(30),
        );
        assert!(token.is_usable());
        assert!(!token.is_expired());
    }

    #[test]
    fn revoked_token_is_unusable() {
        let mut token = RefreshToken::new(
            Uuid::new_v4(),
            hash_token("some.jwt.value"),
            Utc::now() + Duration::days(30),
        );
        token.revoke();
        assert!(!token.is_usable());
    }

    #[test]
    fn expired_token_is_unusable() {
        let token = RefreshToken::new(
            Uuid::new_v4(),
            hash_token("some.jwt.value"),
            Utc::now() - Duration::seconds(1),
        );
        assert!(token.is_expired());
        assert!(!token.is_usable());
    }

    #[test]
    fn token_hashing_is_stable_and_hex() {
        let a = hash_token("token-a");
        let b = hash_token("token-a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_token("token-b"));
    }
}
